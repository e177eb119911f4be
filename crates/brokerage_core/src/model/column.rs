//! Kanban pipeline stages.

use super::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Fixed pipeline stages, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnId {
    NotStarted,
    InProgress,
    WaitingFeedback,
    Completed,
}

impl ColumnId {
    pub const ALL: [ColumnId; 4] = [
        ColumnId::NotStarted,
        ColumnId::InProgress,
        ColumnId::WaitingFeedback,
        ColumnId::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::WaitingFeedback => "waiting-feedback",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == value)
    }

    /// Default display name.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::NotStarted => "Não Iniciado",
            Self::InProgress => "Em Andamento",
            Self::WaitingFeedback => "Aguardando Retorno",
            Self::Completed => "Concluído",
        }
    }

    /// Default color tag.
    pub fn default_color(self) -> &'static str {
        match self {
            Self::NotStarted => "bg-slate-500",
            Self::InProgress => "bg-blue-500",
            Self::WaitingFeedback => "bg-yellow-500",
            Self::Completed => "bg-green-500",
        }
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, ordered bucket of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub color: String,
    /// Order is the on-screen order and the drag target index space.
    #[serde(rename = "items", default)]
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn empty(id: ColumnId) -> Self {
        Self {
            id,
            name: id.default_name().to_string(),
            color: id.default_color().to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(id: ColumnId, tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::empty(id)
        }
    }

    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == task_id)
    }

    pub fn task_ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnId;

    #[test]
    fn column_ids_round_trip_through_text() {
        for id in ColumnId::ALL {
            assert_eq!(ColumnId::parse(id.as_str()), Some(id));
            assert_eq!(
                serde_json::to_value(id).unwrap(),
                serde_json::json!(id.as_str())
            );
        }
        assert_eq!(ColumnId::parse("archived"), None);
    }
}
