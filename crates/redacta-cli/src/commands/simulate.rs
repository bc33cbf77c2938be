use std::io::{BufRead, Write};

use clap::Args;
use redacta_core::SimulationQuestion;

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of questions (config default when omitted)
    #[arg(long)]
    pub count: Option<u32>,
    /// Comma-separated subject list (config default when omitted)
    #[arg(long)]
    pub subjects: Option<String>,
}

pub async fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut app, config) = super::open_app()?;
    let gateway = super::gateway(&config)?;

    let count = args.count.unwrap_or(config.simulation.question_count);
    let subjects: Vec<String> = match &args.subjects {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => config.simulation.subjects.clone(),
    };

    println!("Gerando {count} questões ({})...", subjects.join(", "));
    let questions = app.generate_simulation(&gateway, count, &subjects).await?;

    let stdin = std::io::stdin();
    let mut answers = Vec::with_capacity(questions.len());
    for (idx, question) in questions.iter().enumerate() {
        answers.push(ask(&stdin, idx, question)?);
    }

    let mut correct = 0;
    for (idx, question) in questions.iter().enumerate() {
        if answers[idx] == question.correct_answer {
            correct += 1;
        } else {
            println!();
            println!("Questão {} ({}): incorreta.", idx + 1, question.subject);
            println!(
                "Resposta certa: {}",
                question.options.get(question.correct_answer).map(String::as_str).unwrap_or("?")
            );
            println!("{}", question.explanation);
        }
    }

    app.complete_simulation(&questions, &answers)?;
    let stats = app.stats();
    println!();
    println!("Acertos: {correct}/{}", questions.len());
    println!("TRI estimado: {:.0}", stats.tri_score_estimate);
    println!("Nível {}  ({} / {} xp)", stats.level, stats.xp, stats.next_level_xp);
    Ok(())
}

/// Print one question and read a 1-based option choice from stdin.
fn ask(
    stdin: &std::io::Stdin,
    idx: usize,
    question: &SimulationQuestion,
) -> Result<usize, Box<dyn std::error::Error>> {
    println!();
    println!(
        "[{}] ({} / {})",
        idx + 1,
        question.subject,
        question.difficulty.as_str()
    );
    println!("{}", question.question);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }

    loop {
        print!("Resposta [1-{}]: ", question.options.len());
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err("entrada encerrada antes do fim do simulado".into());
        }
        match line.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= question.options.len() => return Ok(n - 1),
            _ => println!("Opção inválida."),
        }
    }
}
