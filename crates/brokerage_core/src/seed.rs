//! Built-in demo data loaded when storage is empty.

use crate::context::ADMIN_PERMISSIONS;
use crate::model::column::{Column, ColumnId};
use crate::model::directory::{MemberStatus, Role, Seller, User};
use crate::model::prospect::{Attachment, Prospect, ProspectStatus, Situation};
use crate::model::task::{Note, Priority, Task};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn seller(id: &str, name: &str, email: &str, region: &str, status: MemberStatus) -> Seller {
    Seller {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: String::new(),
        region: region.to_string(),
        avatar_fallback: crate::model::directory::avatar_fallback(name),
        status,
    }
}

pub fn sellers() -> Vec<Seller> {
    vec![
        seller(
            "seller1",
            "Bruno Vasconcelos",
            "bruno.v@example.com",
            "São Paulo - Capital",
            MemberStatus::Active,
        ),
        seller(
            "seller2",
            "Daniel Furtado",
            "daniel.f@example.com",
            "Rio de Janeiro",
            MemberStatus::Active,
        ),
        seller(
            "seller3",
            "Carla Matos",
            "carla.m@example.com",
            "Minas Gerais",
            MemberStatus::Inactive,
        ),
        seller(
            "seller4",
            "Rafael Lima",
            "rafael.l@example.com",
            "Rio Grande do Sul",
            MemberStatus::Active,
        ),
    ]
}

struct TaskSeed {
    id: &'static str,
    title: &'static str,
    client: (&'static str, &'static str, &'static str),
    description: &'static str,
    progress: u8,
    tags: &'static [&'static str],
    assigned_to: &'static str,
    last_activity: NaiveDate,
    priority: Priority,
    value: f64,
}

impl TaskSeed {
    fn build(self) -> Task {
        let (client_name, client_phone, client_email) = self.client;
        Task {
            id: self.id.to_string(),
            title: self.title.to_string(),
            client_name: client_name.to_string(),
            client_phone: client_phone.to_string(),
            client_email: client_email.to_string(),
            description: self.description.to_string(),
            assigned_to: self.assigned_to.to_string(),
            created_by: Some("admin".to_string()),
            tags: self.tags.iter().map(|tag| tag.to_string()).collect(),
            progress: self.progress,
            priority: self.priority,
            value: self.value,
            notes: Vec::new(),
            created_on: self.last_activity,
            last_activity: self.last_activity,
        }
    }
}

/// The four pipeline columns with their demo cards.
pub fn board_columns() -> Vec<Column> {
    let not_started = vec![
        TaskSeed {
            id: "task-1",
            title: "Miguel Ferreira - Prospecção Saúde",
            client: ("Miguel Ferreira", "12-99770-XXXX", "miguel.f@example.com"),
            description: "Cliente interessado em plano de saúde individual. Ligar para agendar conversa.",
            progress: 0,
            tags: &["Saúde", "Novo Cliente"],
            assigned_to: "seller1",
            last_activity: date(2025, 6, 1),
            priority: Priority::High,
            value: 300.0,
        }
        .build(),
        TaskSeed {
            id: "task-2",
            title: "Ana Clara - Cotação Residencial",
            client: ("Ana Clara Matos", "34-98866-YYYY", "ana.clara@example.com"),
            description: "Solicitou cotação para seguro residencial completo. Verificar cobertura para área externa.",
            progress: 0,
            tags: &["Residencial", "Urgente"],
            assigned_to: "seller2",
            last_activity: date(2025, 6, 2),
            priority: Priority::Medium,
            value: 550.0,
        }
        .build(),
    ];

    let mut follow_up = TaskSeed {
        id: "task-3",
        title: "Follow-up João Silva",
        client: ("João Silva Pereira", "56-97755-ZZZZ", "joao.silva@example.com"),
        description: "Realizar follow-up sobre a proposta de seguro auto enviada semana passada.",
        progress: 50,
        tags: &["Automóvel", "Retorno"],
        assigned_to: "seller1",
        last_activity: date(2025, 6, 3),
        priority: Priority::High,
        value: 1200.0,
    }
    .build();
    follow_up.notes.push(Note {
        id: "note-1".to_string(),
        text: "Cliente pediu para ligar após as 18h.".to_string(),
        date: Utc.from_utc_datetime(&date(2025, 6, 3).and_time(NaiveTime::MIN)),
    });

    let waiting = vec![TaskSeed {
        id: "task-5",
        title: "Proposta Empresa XYZ",
        client: (
            "Empresa XYZ (Contato: Sra. Marta)",
            "11-5555-4444",
            "marta@xyzcorp.com",
        ),
        description: "Proposta de seguro empresarial enviada. Aguardando aprovação da diretoria.",
        progress: 75,
        tags: &["Empresarial", "Proposta Enviada"],
        assigned_to: "seller3",
        last_activity: date(2025, 6, 4),
        priority: Priority::High,
        value: 5000.0,
    }
    .build()];

    let completed = vec![TaskSeed {
        id: "task-4",
        title: "Apólice Vida - Família Souza",
        client: (
            "Família Souza (Contato: Roberto)",
            "78-96644-WWWW",
            "roberto.souza@example.com",
        ),
        description: "Apólice de seguro de vida familiar emitida e enviada ao cliente.",
        progress: 100,
        tags: &["Vida", "Família", "Fechado"],
        assigned_to: "seller2",
        last_activity: date(2025, 5, 20),
        priority: Priority::Medium,
        value: 800.0,
    }
    .build()];

    vec![
        Column::with_tasks(ColumnId::NotStarted, not_started),
        Column::with_tasks(ColumnId::InProgress, vec![follow_up]),
        Column::with_tasks(ColumnId::WaitingFeedback, waiting),
        Column::with_tasks(ColumnId::Completed, completed),
    ]
}

#[allow(clippy::too_many_arguments)]
fn prospect(
    id: &str,
    policy_end: NaiveDate,
    client: &str,
    product: &str,
    insurer: &str,
    seller: &str,
    plans: (&str, &str),
    percents: (&str, &str),
    premiums: (f64, f64),
) -> Prospect {
    Prospect {
        policy_end: Some(policy_end),
        client: client.to_string(),
        product: product.to_string(),
        insurer: insurer.to_string(),
        seller: seller.to_string(),
        previous_plan: plans.0.to_string(),
        current_plan: plans.1.to_string(),
        previous_percent: percents.0.to_string(),
        current_percent: percents.1.to_string(),
        previous_premium: premiums.0,
        current_premium: premiums.1,
        ..Prospect::blank(id)
    }
}

pub fn prospects() -> Vec<Prospect> {
    let mut juliana = prospect(
        "PROS001",
        date(2025, 7, 15),
        "Juliana Paes",
        "Automóvel Completo",
        "Porto Seguro",
        "Carlos Silva",
        ("Plano Basic", "Plano Top"),
        ("5", "7"),
        (5000.0, 5000.0),
    );
    juliana.analysis = "Positiva".to_string();
    juliana.status = ProspectStatus::Negotiating;
    juliana.situation = Situation::AwaitingClient;
    juliana.observation = "Cliente pediu para ligar na sexta.".to_string();

    let mut ricardo = prospect(
        "PROS002",
        date(2025, 8, 1),
        "Ricardo Alves",
        "Residencial Essencial",
        "Tokio Marine",
        "Ana Beatriz",
        ("Cobertura Padrão", "Cobertura Padrão"),
        ("3", "3"),
        (5000.0, 5000.0),
    );
    ricardo.analysis = "Neutra".to_string();
    ricardo.status = ProspectStatus::Contact;
    ricardo.situation = Situation::PendingSeller;
    ricardo.observation = "Apólice vence em 45 dias.".to_string();

    let mut sofia = prospect(
        "PROS003",
        date(2025, 6, 30),
        "Sofia Bernardes",
        "Vida Total",
        "Bradesco Seguros",
        "Carlos Silva",
        ("Vida Individual", "Vida Individual Plus"),
        ("10", "12"),
        (4000.0, 4000.0),
    );
    sofia.analysis = "Positiva".to_string();
    sofia.status = ProspectStatus::Converted;
    sofia.situation = Situation::Closed;
    sofia.observation = "Apólice emitida.".to_string();
    sofia.attachment = Some(Attachment {
        name: "apolice_sofia_2024.pdf".to_string(),
        size: 245_388,
        mime_type: "application/pdf".to_string(),
    });

    vec![juliana, ricardo, sofia]
}

pub fn roles() -> Vec<Role> {
    vec![
        Role {
            id: "mock-admin-role-id".to_string(),
            name: "Admin".to_string(),
            permissions: ADMIN_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
        },
        Role {
            id: "mock-user-role-id".to_string(),
            name: "Usuário".to_string(),
            permissions: vec!["/dashboard".to_string(), "/ajuda".to_string()],
        },
    ]
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: "mock-admin-id".to_string(),
            name: "Admin Mockado".to_string(),
            email: "admin@example.com".to_string(),
            role_id: "mock-admin-role-id".to_string(),
            role_name: "Admin".to_string(),
            status: MemberStatus::Active,
        },
        User {
            id: "mock-user1-id".to_string(),
            name: "Usuário Mock 1".to_string(),
            email: "user1@example.com".to_string(),
            role_id: "mock-user-role-id".to_string(),
            role_name: "Usuário".to_string(),
            status: MemberStatus::Active,
        },
    ]
}
