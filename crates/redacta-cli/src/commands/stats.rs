use chrono::{NaiveDate, Utc};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current level, xp and ability estimate
    Show {
        /// Raw JSON output
        #[arg(long)]
        json: bool,
    },
    /// Per-subject accuracy, weakest first
    Weakness,
    /// Set or clear the exam date (YYYY-MM-DD)
    ExamDate {
        date: Option<String>,
        /// Remove the stored exam date
        #[arg(long)]
        clear: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut app, _config) = super::open_app()?;

    match action {
        StatsAction::Show { json } => {
            let stats = app.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(stats)?);
                return Ok(());
            }
            println!(
                "Nível {}  ({} / {} xp, {:.0}%)",
                stats.level,
                stats.xp,
                stats.next_level_xp,
                stats.xp_progress() * 100.0
            );
            println!("TRI estimado: {:.0}", stats.tri_score_estimate);
            println!("Redações corrigidas: {}", stats.corrected_essays);
            println!("Simulados completos: {}", stats.completed_simulations);
            if let Some(days) = stats.days_until_exam(Utc::now().date_naive()) {
                println!("Dias até a prova: {days}");
            }
        }
        StatsAction::Weakness => {
            let report = app.weakness_report();
            if report.is_empty() {
                println!("Nenhum simulado registrado ainda.");
                return Ok(());
            }
            for entry in report {
                println!(
                    "{:<24} {:>3.0}%  ({}/{})",
                    entry.subject,
                    entry.accuracy * 100.0,
                    entry.correct,
                    entry.total
                );
            }
        }
        StatsAction::ExamDate { date, clear } => {
            if clear {
                app.set_exam_date(None);
                println!("Data da prova removida.");
            } else if let Some(raw) = date {
                let parsed = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?;
                app.set_exam_date(Some(parsed));
                println!("Data da prova: {parsed}");
            } else if let Some(exam) = app.stats().exam_date {
                println!("Data da prova: {exam}");
            } else {
                println!("Nenhuma data de prova definida.");
            }
        }
    }
    Ok(())
}
