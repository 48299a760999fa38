use super::dataset::Dataset;
use super::records::{
    AiService, ChangeRequest, ChangeType, CiType, CmdbGroup, CmdbLink, CmdbNode, CmdbTopology,
    ConfigItem, Epic, Goal, Incident, Priority, Problem, Risk, Service, ServiceHealth, Status,
};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn opt(value: &str) -> Option<String> {
    Some(value.to_owned())
}

#[allow(clippy::too_many_arguments)]
fn incident(
    id: &str,
    title: &str,
    description: &str,
    priority: Priority,
    status: Status,
    assignee: &str,
    created: &str,
    service_id: &str,
    related_ci_ids: &[&str],
    problem_id: &str,
) -> Incident {
    Incident {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        priority,
        status,
        assignee: assignee.to_owned(),
        created: created.to_owned(),
        service_id: opt(service_id),
        related_ci_ids: ids(related_ci_ids),
        problem_id: opt(problem_id),
        change_id: opt(""),
    }
}

fn service(id: &str, name: &str, description: &str, owner: &str, health: ServiceHealth) -> Service {
    Service {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        owner: owner.to_owned(),
        health,
    }
}

fn config_item(
    id: &str,
    name: &str,
    ci_type: CiType,
    version: &str,
    location: &str,
    owner: &str,
) -> ConfigItem {
    ConfigItem {
        id: id.to_owned(),
        name: name.to_owned(),
        ci_type,
        version: version.to_owned(),
        location: location.to_owned(),
        owner: owner.to_owned(),
    }
}

fn goal(id: &str, name: &str, description: &str, status: &str) -> Goal {
    Goal {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        status: status.to_owned(),
    }
}

fn cmdb_node(id: &str, group: CmdbGroup, label: &str) -> CmdbNode {
    CmdbNode {
        id: id.to_owned(),
        group,
        label: label.to_owned(),
    }
}

fn cmdb_link(source: &str, target: &str) -> CmdbLink {
    CmdbLink {
        source: source.to_owned(),
        target: target.to_owned(),
    }
}

/// Built-in demo data. `PRB00047` deliberately references an incident id that
/// does not exist, and `INC000998`/`INC000800` are never defined either.
pub fn sample_dataset() -> Dataset {
    let incidents = vec![
        incident(
            "INC001023",
            "Email Service Interruption",
            "Users are unable to send emails to external domains. Internal mail flow is working.",
            Priority::Critical,
            Status::InProgress,
            "Sarah Jenkins",
            "2023-10-24T08:30:00Z",
            "SVC001",
            &["CI-SRV-001"],
            "",
        ),
        incident(
            "INC001024",
            "VPN Connectivity Flapping",
            "Remote users reporting intermittent disconnections from the VPN gateway in the East \
             region.",
            Priority::High,
            Status::New,
            "Network Ops",
            "2023-10-24T09:15:00Z",
            "SVC003",
            &["CI-NET-001"],
            "",
        ),
        incident(
            "INC001025",
            "Printer Jam on 3rd Floor",
            "The main corridor printer is jamming repeatedly.",
            Priority::Low,
            Status::Resolved,
            "Helpdesk",
            "2023-10-23T14:00:00Z",
            "SVC005",
            &[],
            "",
        ),
        incident(
            "INC001026",
            "CRM Application Slow",
            "Sales team reporting high latency when loading customer records.",
            Priority::Medium,
            Status::InProgress,
            "App Support",
            "2023-10-24T10:00:00Z",
            "SVC002",
            &["CI-APP-001", "CI-DB-001"],
            "PRB00047",
        ),
    ];

    let problems = vec![
        Problem {
            id: "PRB00045".to_owned(),
            title: "Recurring Storage Latency".to_owned(),
            description: "Multiple incidents regarding slow file access on the SAN.".to_owned(),
            root_cause: "Pending investigation. Suspect firmware bug in storage controller."
                .to_owned(),
            status: Status::InProgress,
            priority: Priority::High,
            service_id: opt("SVC002"),
            related_risk_ids: ids(&["RSK-001"]),
            related_incidents: ids(&["INC001026", "INC000998"]),
        },
        Problem {
            id: "PRB00046".to_owned(),
            title: "Authentication Service Memory Leak".to_owned(),
            description: "Auth service requires weekly restart due to memory consumption."
                .to_owned(),
            root_cause: "Identified memory leak in the token validation module.".to_owned(),
            status: Status::Resolved,
            priority: Priority::Medium,
            service_id: opt("SVC003"),
            related_risk_ids: Vec::new(),
            related_incidents: ids(&["INC000800"]),
        },
        Problem {
            id: "PRB00047".to_owned(),
            title: "CRM performance and stability issues".to_owned(),
            description: "CRM system is unstable and has poor user experience.".to_owned(),
            root_cause: "Outdated technology stack.".to_owned(),
            status: Status::InProgress,
            priority: Priority::High,
            service_id: opt("SVC002"),
            related_risk_ids: ids(&["RSK-005"]),
            related_incidents: ids(&["INC0001026"]),
        },
    ];

    let changes = vec![
        ChangeRequest {
            id: "CHG00201".to_owned(),
            title: "Upgrade Oracle Database to 19c".to_owned(),
            description: "Major version upgrade for the core ERP database.".to_owned(),
            change_type: ChangeType::Normal,
            implementation_date: "2026-11-03".to_owned(),
        },
        ChangeRequest {
            id: "CHG00202".to_owned(),
            title: "Patch Web Server Security Vulnerability".to_owned(),
            description: "Applying critical security patch to public facing web servers."
                .to_owned(),
            change_type: ChangeType::Emergency,
            implementation_date: "2026-06-03".to_owned(),
        },
    ];

    let services = vec![
        service(
            "SVC001",
            "Enterprise Email",
            "Exchange Online based email service.",
            "Infrastructure Team",
            ServiceHealth::Healthy,
        ),
        service(
            "SVC002",
            "CRM System",
            "Customer Relationship Management platform.",
            "Sales Ops",
            ServiceHealth::Degraded,
        ),
        service(
            "SVC003",
            "VPN Access",
            "Secure remote access solution.",
            "Network Security",
            ServiceHealth::Degraded,
        ),
        service(
            "SVC004",
            "HR Portal",
            "Employee self-service portal.",
            "HR Systems",
            ServiceHealth::Healthy,
        ),
    ];

    let configuration_items = vec![
        config_item(
            "CI-SRV-001",
            "PROD-DB-01",
            CiType::Server,
            "Windows Server 2019",
            "Data Center A",
            "Database Team",
        ),
        config_item(
            "CI-APP-001",
            "Salesforce Connector",
            CiType::Application,
            "v2.4.1",
            "Cloud",
            "App Support",
        ),
        config_item(
            "CI-NET-001",
            "Core-Switch-01",
            CiType::Network,
            "Cisco IOS XE",
            "Data Center A",
            "Network Ops",
        ),
        config_item(
            "CI-DB-001",
            "ERP_MAIN_DB",
            CiType::Database,
            "Oracle 19c",
            "PROD-DB-01",
            "Database Team",
        ),
    ];

    let epics = vec![
        Epic {
            id: "EPC-2024-001".to_owned(),
            title: "Cloud Migration Program".to_owned(),
            description: "Migrate core legacy ERP and CRM applications to AWS.".to_owned(),
            owner: "CTO Office".to_owned(),
            related_service_ids: ids(&["SVC002"]),
            related_change_ids: ids(&["CHG00201"]),
            related_problem_ids: Vec::new(),
            related_risk_ids: ids(&["RSK-001", "RSK-002"]),
            related_goal_ids: ids(&["SG-004"]),
        },
        Epic {
            id: "EPC-2024-002".to_owned(),
            title: "AI-Driven Customer Support".to_owned(),
            description: "Implement Generative AI bots for L1 support.".to_owned(),
            owner: "Customer Success".to_owned(),
            related_service_ids: ids(&["SVC002"]),
            related_change_ids: Vec::new(),
            related_problem_ids: Vec::new(),
            related_risk_ids: Vec::new(),
            related_goal_ids: ids(&["SG-003", "SG-006"]),
        },
        Epic {
            id: "EPC-2024-003".to_owned(),
            title: "Zero Trust Security Framework".to_owned(),
            description: "Implement Zero Trust architecture across all global offices."
                .to_owned(),
            owner: "CISO".to_owned(),
            related_service_ids: ids(&["SVC003"]),
            related_change_ids: Vec::new(),
            related_problem_ids: Vec::new(),
            related_risk_ids: ids(&["RSK-004"]),
            related_goal_ids: ids(&["SG-002"]),
        },
        Epic {
            id: "EPC-2024-004".to_owned(),
            title: "Self-Service HR Portal".to_owned(),
            description: "Revamp the HR portal for self-service benefits and time-off."
                .to_owned(),
            owner: "HR Director".to_owned(),
            related_service_ids: ids(&["SVC004"]),
            related_change_ids: Vec::new(),
            related_problem_ids: Vec::new(),
            related_risk_ids: Vec::new(),
            related_goal_ids: ids(&["SG-006"]),
        },
        Epic {
            id: "EPC-2024-005".to_owned(),
            title: "Migrate CRM system to SAAS".to_owned(),
            description: "Select and implement new CRM SAAS solution.".to_owned(),
            owner: "Customer Relationship Manager".to_owned(),
            related_service_ids: ids(&["SVC002"]),
            related_change_ids: Vec::new(),
            related_problem_ids: ids(&["PRB00047"]),
            related_risk_ids: ids(&["RSK-005"]),
            related_goal_ids: ids(&["SG-007"]),
        },
    ];

    let risk = |id: &str,
                title: &str,
                description: &str,
                category: &str,
                owner: &str,
                likelihood: u8,
                impact: u8| Risk {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        category: category.to_owned(),
        owner: owner.to_owned(),
        likelihood,
        impact,
        ..Risk::default()
    };

    let risks = vec![
        Risk {
            related_service_ids: ids(&["SVC002"]),
            related_epic_ids: ids(&["EPC-2024-005"]),
            related_goal_ids: ids(&["SG-007"]),
            ..risk(
                "RSK-005",
                "End-of-life CRM system",
                "The current CRM system is out of support / end-of-life.",
                "Technology Debt",
                "CRM product team",
                4,
                4,
            )
        },
        Risk {
            related_service_ids: ids(&["SVC002"]),
            related_epic_ids: ids(&["EPC-2024-001"]),
            related_ai_service_ids: ids(&["AI-002"]),
            related_goal_ids: ids(&["SG-005"]),
            ..risk(
                "RSK-002",
                "GDPR Compliance Violation",
                "Potential for customer data leakage due to unpatched legacy CRM system.",
                "Compliance",
                "Data Privacy Officer",
                3,
                5,
            )
        },
        Risk {
            related_service_ids: ids(&["SVC002", "SVC004"]),
            related_goal_ids: ids(&["SG-002"]),
            ..risk(
                "RSK-003",
                "Key Vendor Bankruptcy",
                "Primary software development vendor showing signs of financial instability.",
                "Strategic",
                "Vendor Management",
                4,
                4,
            )
        },
        Risk {
            related_service_ids: ids(&["SVC001", "SVC003"]),
            related_epic_ids: ids(&["EPC-2024-003"]),
            related_goal_ids: ids(&["SG-002"]),
            ..risk(
                "RSK-004",
                "Phishing Attack Success",
                "Employees falling for sophisticated phishing attacks leading to credential theft.",
                "Security",
                "CISO",
                4,
                3,
            )
        },
        Risk {
            related_service_ids: ids(&["SVC001", "SVC002"]),
            related_epic_ids: ids(&["EPC-2024-001"]),
            related_goal_ids: ids(&["SG-002"]),
            ..risk(
                "RSK-001",
                "Data Center Power Failure",
                "Risk of prolonged outage due to failure of backup generators during a power cut.",
                "Operational",
                "Infrastructure Manager",
                2,
                5,
            )
        },
        Risk {
            related_service_ids: ids(&["SVC004"]),
            related_ai_service_ids: ids(&["AI-002"]),
            related_goal_ids: ids(&["SG-005"]),
            ..risk(
                "RSK-006",
                "Absence of Human Oversight Mechanisms",
                "Insufficient human review before final decisions of a high-risk AI system.",
                "Operational",
                "HR Manager",
                2,
                5,
            )
        },
    ];

    let ai_services = vec![
        AiService {
            id: "AI-001".to_owned(),
            name: "Customer Support Chatbot".to_owned(),
            description: "GenAI based chatbot for L1 support.".to_owned(),
            service_id: opt("SVC002"),
            related_risk_ids: Vec::new(),
        },
        AiService {
            id: "AI-002".to_owned(),
            name: "Resume Screening Algorithm".to_owned(),
            description: "ML model to filter job applicants.".to_owned(),
            service_id: opt("SVC004"),
            related_risk_ids: ids(&["RSK-006"]),
        },
    ];

    let goals = vec![
        goal(
            "SG-001",
            "Reduce Time to Market",
            "Decrease the average time from idea to production.",
            "At Risk",
        ),
        goal(
            "SG-002",
            "Ensure High Availability",
            "Maintain 99.99% uptime for critical services.",
            "On Track",
        ),
        goal(
            "SG-003",
            "Launch AI Features",
            "Deliver 5 new AI-powered features to customers.",
            "On Track",
        ),
        goal(
            "SG-004",
            "Reduce Cloud Spend",
            "Optimize cloud infrastructure to reduce monthly costs.",
            "Off Track",
        ),
        goal(
            "SG-005",
            "AI Act Compliance",
            "Ensure all AI systems meet EU AI Act requirements.",
            "At Risk",
        ),
        goal(
            "SG-006",
            "Improve End-User Support",
            "Increase internal customer satisfaction with IT support.",
            "On Track",
        ),
        goal(
            "SG-007",
            "Reduce Technical Debt",
            "Ensure all systems are supported and up-to-date.",
            "Off Track",
        ),
    ];

    let cmdb = CmdbTopology {
        nodes: vec![
            cmdb_node("BP-001", CmdbGroup::Process, "Order to Cash"),
            cmdb_node("SVC002", CmdbGroup::Application, "CRM System"),
            cmdb_node("CI-APP-001", CmdbGroup::Application, "Salesforce Connector"),
            cmdb_node("CI-SRV-001", CmdbGroup::Server, "PROD-DB-01"),
            cmdb_node("CI-DB-001", CmdbGroup::Database, "ERP_MAIN_DB"),
            cmdb_node("CI-NET-001", CmdbGroup::Network, "Core-Switch-01"),
        ],
        links: vec![
            cmdb_link("BP-001", "SVC002"),
            cmdb_link("SVC002", "CI-APP-001"),
            cmdb_link("SVC002", "CI-DB-001"),
            cmdb_link("CI-DB-001", "CI-SRV-001"),
            cmdb_link("CI-SRV-001", "CI-NET-001"),
        ],
    };

    Dataset {
        incidents,
        problems,
        changes,
        services,
        configuration_items,
        epics,
        risks,
        ai_services,
        goals,
        cmdb,
    }
}
