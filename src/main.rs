//! Entry point for the PersonalKnowledgeRAG CLI (`pkr`).
//!
//! Loads the configuration and prompt template, builds a [`RagSession`], seeds
//! it with the sample documents, and dispatches the parsed subcommand.
//!
//! ```sh
//! pkr ask "What is AI?" --level beginner --style casual
//! pkr interactive --user ada
//! pkr init
//! ```

use clap::Parser;
use once_cell::sync::OnceCell;
use std::{error::Error, fs, io, path::Path};
use tracing::{debug, info};

use personal_knowledge_rag::{
    commands::{Cli, Commands},
    config::{self, RagConfig},
    config_dir, interactive,
    profile::Preferences,
    session::RagSession,
    template::{self, DEFAULT_TEMPLATE_NAME, PromptTemplate},
};

static TRACING: OnceCell<()> = OnceCell::new();

fn main() -> Result<(), Box<dyn Error>> {
    TRACING.get_or_init(|| {
        tracing_subscriber::fmt::init();
    });
    run()
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config_path = config::config_path(cli.config)?;

    match cli.command {
        Commands::Ask {
            question,
            user,
            level,
            style,
            json,
        } => {
            let (rag_config, mut session) = build_session(&config_path)?;
            let user_id = user.unwrap_or_else(|| rag_config.default_user_id.clone());
            if level.is_some() || style.is_some() {
                session.create_or_update_profile(
                    &user_id,
                    Preferences {
                        level,
                        style,
                        ..Preferences::default()
                    },
                );
            }

            let question = question.unwrap_or_else(|| "What is AI?".to_string());
            debug!("Asking question: {:?}", question);
            let answer = session.get_personalized_answer(&question, &user_id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("Personalized Answer:");
                println!("{}", answer.response);
                println!("Retrieved {} relevant documents", answer.retrieved_docs);
            }
        }
        Commands::Interactive { user } => {
            let (rag_config, mut session) = build_session(&config_path)?;
            let user_id = user.unwrap_or_else(|| rag_config.default_user_id.clone());
            interactive::run(&mut session, user_id, io::stdin().lock(), io::stdout())?;
        }
        Commands::Init => init()?,
    }

    Ok(())
}

/// Load config and template, then build a session seeded per the config.
fn build_session(config_path: &Path) -> Result<(RagConfig, RagSession), Box<dyn Error>> {
    let rag_config = config::load_config_or_default(config_path)?;
    debug!("Config loaded: {:?}", rag_config);

    let prompt_template = template::load_template_or_default(&rag_config.template)?;
    let mut session = RagSession::new(&rag_config, prompt_template);
    if rag_config.seed_sample_documents {
        session.seed_sample_documents()?;
    }
    Ok((rag_config, session))
}

/// Write the default config and prompt template under the config directory.
///
/// Existing files are overwritten.
fn init() -> Result<(), Box<dyn Error>> {
    let config_dir = config_dir()?;
    let templates_dir = config_dir.join("templates");
    info!("Creating template directory: {}", templates_dir.display());
    fs::create_dir_all(&templates_dir)?;

    let template_path = templates_dir.join(format!("{DEFAULT_TEMPLATE_NAME}.yaml"));
    info!("Creating template file: {}", template_path.display());
    fs::write(&template_path, serde_yaml::to_string(&PromptTemplate::default())?)?;

    let config_path = config_dir.join("config.yaml");
    info!("Creating config file: {}", config_path.display());
    fs::write(&config_path, serde_yaml::to_string(&RagConfig::default())?)?;

    println!("Wrote {}", config_path.display());
    println!("Wrote {}", template_path.display());
    Ok(())
}
