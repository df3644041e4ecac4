//! DocQueue CLI
//!
//! Command-line front desk for the clinic, working directly on the local
//! data directory:
//! - Register and log in as a doctor
//! - Add walk-in patients and call them in token order
//! - Record visit notes and search past records
//! - Ask the AI assistant

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use docqueue::assistant::{build_context, Conversation, MedicalAssistant};
use docqueue::clinic::{ClinicStore, NewAppointmentForm, QueueBoard, RegistrationForm};
use docqueue::config::Config;
use docqueue::storage::{Appointment, AppointmentStatus, VisitNote};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "docqueue-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clinic patient queue manager")]
#[command(long_about = "DocQueue manages a doctor's walk-in queue.\nPatients get sequential tokens, visits get notes, and an AI assistant helps with diagnoses.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/docqueue/config.toml or ./docqueue.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the config
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a doctor account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        specialty: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Log in as an existing doctor
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Log out
    Logout,

    /// Show the logged-in doctor
    Whoami,

    /// Add a walk-in patient to the queue
    Add {
        /// Patient name
        name: String,
        /// Phone number
        phone: String,
        /// Reason for visit
        #[arg(short, long, default_value = "")]
        reason: String,
    },

    /// Show the queue board
    Queue,

    /// Call the next waiting patient
    Next,

    /// Change an appointment's status
    Status {
        /// Token number or appointment id
        appointment: String,
        /// waiting, in_consult or done
        status: AppointmentStatus,
    },

    /// Save the visit note for an appointment
    Note {
        /// Token number or appointment id
        appointment: String,
        #[arg(long, default_value = "")]
        symptoms: String,
        #[arg(long, default_value = "")]
        diagnosis: String,
        #[arg(long, default_value = "")]
        prescription: String,
    },

    /// Show one appointment
    Show {
        /// Token number or appointment id
        appointment: String,
    },

    /// Search records by name, phone or diagnosis
    Records {
        /// Search term (empty = all)
        #[arg(default_value = "")]
        term: String,
    },

    /// Ask the AI assistant a single question
    Ask {
        query: String,
        /// Use this appointment's visit note as context
        #[arg(short, long)]
        appointment: Option<String>,
    },

    /// Chat with the AI assistant (type "exit" to leave)
    Chat {
        /// Use this appointment's visit note as context
        #[arg(short, long)]
        appointment: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_default(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(docqueue::logging::filter_directive(&config.logging))
            .with_writer(std::io::stderr)
            .init();
    }

    if let Commands::Config { output } = &cli.command {
        let template = docqueue::config::generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &template)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    let data_dir = config.storage.data_path();
    let mut clinic = ClinicStore::open_dir(&data_dir)
        .with_context(|| format!("Failed to open data directory {:?}", data_dir))?;

    match cli.command {
        Commands::Register {
            name,
            specialty,
            username,
            password,
        } => {
            let form = RegistrationForm {
                name,
                specialty,
                username,
                password,
            };
            form.validate()?;

            if !clinic.register(&form.name, &form.specialty, &form.username, &form.password)? {
                bail!("Username '{}' already exists", form.username);
            }
            println!("Registered and logged in as {}", form.username);
        }

        Commands::Login { username, password } => {
            if !clinic.login(&username, &password)? {
                bail!("Invalid credentials");
            }
            println!("Logged in as {}", username);
        }

        Commands::Logout => {
            clinic.logout()?;
            println!("Logged out");
        }

        Commands::Whoami => match clinic.current_doctor() {
            Some(doctor) => {
                println!("{} ({})", doctor.name, doctor.specialty);
                println!("Username: {}", doctor.username);
            }
            None => println!("Not logged in"),
        },

        Commands::Add {
            name,
            phone,
            reason,
        } => {
            require_login(&clinic)?;
            let form = NewAppointmentForm {
                patient_name: name,
                phone,
                reason,
            };
            form.validate()?;

            let appt = clinic
                .add_appointment(&form.patient_name, &form.phone, &form.reason)?
                .context("Not logged in")?;
            println!("Token #{} issued to {}", appt.queue_number, appt.patient_name);
        }

        Commands::Queue => {
            require_login(&clinic)?;
            let board = clinic.board();

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&board)?),
                _ => print_board(&board),
            }
        }

        Commands::Next => {
            require_login(&clinic)?;
            match clinic.call_next_patient()? {
                Some(appt) => println!(
                    "Now seeing #{} {} ({})",
                    appt.queue_number,
                    appt.patient_name,
                    display_or_dash(&appt.reason)
                ),
                None => println!("No patients waiting"),
            }
        }

        Commands::Status {
            appointment,
            status,
        } => {
            let id = resolve_appointment(&clinic, &appointment)?;
            if !clinic.update_status(id, status)? {
                bail!("Appointment {} not found", appointment);
            }
            println!("Appointment {} is now {}", appointment, status.label());
        }

        Commands::Note {
            appointment,
            symptoms,
            diagnosis,
            prescription,
        } => {
            let id = resolve_appointment(&clinic, &appointment)?;
            let note = VisitNote::new(symptoms, diagnosis, prescription);
            if !clinic.save_visit_note(id, note)? {
                bail!("Appointment {} not found", appointment);
            }
            println!("Notes saved");
        }

        Commands::Show { appointment } => {
            let id = resolve_appointment(&clinic, &appointment)?;
            let appt = clinic
                .get_appointment(id)
                .with_context(|| format!("Appointment {} not found", appointment))?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(appt)?),
                _ => print_appointment(appt),
            }
        }

        Commands::Records { term } => {
            require_login(&clinic)?;
            let records = clinic.search_records(&term);

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&records)?),
                "csv" => print_csv(&records)?,
                _ => print_table(&records),
            }
        }

        Commands::Ask { query, appointment } => {
            let context = assistant_context(&clinic, appointment.as_deref())?;
            let assistant = MedicalAssistant::gemini(config.assistant.gemini());
            println!("{}", assistant.generate(&context, &query).await);
        }

        Commands::Chat { appointment } => {
            let context = assistant_context(&clinic, appointment.as_deref())?;
            let assistant = MedicalAssistant::gemini(config.assistant.gemini());
            run_chat(&assistant, &context).await?;
        }

        // Written out before the store is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn require_login(clinic: &ClinicStore) -> anyhow::Result<()> {
    if !clinic.is_authenticated() {
        bail!("Not logged in. Run: docqueue-cli login <username> --password <password>");
    }
    Ok(())
}

/// Accept either an appointment id or a token number from the doctor's queue
fn resolve_appointment(clinic: &ClinicStore, ident: &str) -> anyhow::Result<Uuid> {
    require_login(clinic)?;

    if let Ok(id) = ident.parse::<Uuid>() {
        return Ok(id);
    }

    let token: u32 = ident
        .trim_start_matches('#')
        .parse()
        .with_context(|| format!("Expected a token number or appointment id, got '{}'", ident))?;

    clinic
        .appointments()
        .into_iter()
        .find(|a| a.queue_number == token)
        .map(|a| a.id)
        .with_context(|| format!("No appointment with token #{}", token))
}

fn assistant_context(clinic: &ClinicStore, appointment: Option<&str>) -> anyhow::Result<String> {
    require_login(clinic)?;

    let Some(ident) = appointment else {
        return Ok(build_context(None, None));
    };

    let id = resolve_appointment(clinic, ident)?;
    let note = clinic
        .get_appointment(id)
        .with_context(|| format!("Appointment {} not found", ident))?
        .visit_notes
        .as_ref();

    Ok(build_context(
        note.map(|n| n.symptoms.as_str()),
        note.map(|n| n.diagnosis.as_str()),
    ))
}

async fn run_chat(assistant: &MedicalAssistant, context: &str) -> anyhow::Result<()> {
    println!("AI Medical Assistant ({}). Type \"exit\" to leave.", assistant.model());

    let mut conversation = Conversation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        if let Some(reply) = conversation.ask(assistant, context, &line).await {
            println!("{}", reply.text);
            println!();
        }
    }

    Ok(())
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn print_board(board: &QueueBoard<'_>) {
    let columns = [
        ("Waiting", &board.waiting),
        ("In Consultation", &board.in_consult),
        ("Done (recent)", &board.done),
    ];

    for (title, appts) in columns {
        println!("{} ({})", title, appts.len());
        if appts.is_empty() {
            println!("  -");
        }
        for appt in appts.iter() {
            println!(
                "  #{:<5} {:<24} {}",
                appt.queue_number,
                appt.patient_name,
                display_or_dash(&appt.reason)
            );
        }
        println!();
    }

    if let Some(next) = board.next_up() {
        println!("Next up: #{} {}", next.queue_number, next.patient_name);
    }
}

fn print_appointment(appt: &Appointment) {
    println!("Token:    #{}", appt.queue_number);
    println!("Patient:  {}", appt.patient_name);
    println!("Phone:    {}", appt.phone);
    println!("Reason:   {}", display_or_dash(&appt.reason));
    println!("Status:   {}", appt.status.label());
    println!("Created:  {}", appt.created_at.format("%Y-%m-%d %H:%M"));
    println!("Id:       {}", appt.id);

    if let Some(note) = &appt.visit_notes {
        println!();
        println!("Symptoms:     {}", display_or_dash(&note.symptoms));
        println!("Diagnosis:    {}", display_or_dash(&note.diagnosis));
        println!("Prescription: {}", display_or_dash(&note.prescription));
        println!("Noted at:     {}", note.timestamp.format("%Y-%m-%d %H:%M"));
    }
}

fn print_table(records: &[&Appointment]) {
    if records.is_empty() {
        println!("No records found");
        return;
    }

    println!(
        "{:<12} {:<7} {:<24} {:<15} {}",
        "Date", "Token", "Patient", "Phone", "Diagnosis"
    );
    println!("{}", "-".repeat(80));

    for appt in records {
        println!(
            "{:<12} #{:<6} {:<24} {:<15} {}",
            appt.created_at.format("%Y-%m-%d"),
            appt.queue_number,
            appt.patient_name,
            appt.phone,
            appt.diagnosis().unwrap_or("-")
        );
    }
}

fn print_csv(records: &[&Appointment]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record([
        "created_at",
        "token",
        "patient_name",
        "phone",
        "reason",
        "status",
        "diagnosis",
        "prescription",
    ])?;

    for appt in records {
        let note = appt.visit_notes.as_ref();
        writer.write_record([
            appt.created_at.to_rfc3339(),
            appt.queue_number.to_string(),
            appt.patient_name.clone(),
            appt.phone.clone(),
            appt.reason.clone(),
            appt.status.to_string(),
            note.map(|n| n.diagnosis.clone()).unwrap_or_default(),
            note.map(|n| n.prescription.clone()).unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
