use clap::Subcommand;
use redacta_core::{ChatMode, ChatOrchestrator, ChatRole, SendOutcome, StateStore};

#[derive(Subcommand)]
pub enum ChatAction {
    /// Send a message and print the tutor's reply
    Send {
        /// Session: general, mindmap or summary
        mode: ChatMode,
        message: String,
    },
    /// Print one session's transcript
    Show {
        mode: ChatMode,
    },
    /// Erase one session's transcript
    Clear {
        mode: ChatMode,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(action: ChatAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = StateStore::open()?;
    let mut chat = ChatOrchestrator::load(store);

    match action {
        ChatAction::Send { mode, message } => {
            let config = redacta_core::Config::load()?;
            let gateway = super::gateway(&config)?;
            match chat.send(&gateway, mode, &message).await {
                SendOutcome::Ignored => println!("(mensagem vazia, nada enviado)"),
                SendOutcome::Completed | SendOutcome::Failed => {
                    if let Some(reply) = chat.messages(mode).last() {
                        println!("{}", reply.text);
                    }
                }
            }
        }
        ChatAction::Show { mode } => {
            for message in chat.messages(mode) {
                let who = match message.role {
                    ChatRole::User => "você",
                    ChatRole::Assistant => "tutor",
                };
                println!("[{who}] {}", message.text);
            }
        }
        ChatAction::Clear { mode, yes } => {
            if !yes {
                println!(
                    "Isso apaga todo o histórico da sessão '{}'. Repita com --yes para confirmar.",
                    mode.as_str()
                );
                return Ok(());
            }
            chat.clear(mode);
            println!("Sessão '{}' apagada.", mode.as_str());
        }
    }
    Ok(())
}
