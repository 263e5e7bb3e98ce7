//! The `readalong select` command.

use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use readalong_core::difficulty::{adjusted_time_limit, select_questions, target_difficulty};
use readalong_core::model::{DifficultyModifier, Grade, Question};
use readalong_core::parser;

pub fn execute(
    bank_path: PathBuf,
    grade: String,
    modifier: i64,
    count: usize,
    seed: Option<u64>,
) -> Result<()> {
    let grade: Grade = grade.parse()?;
    let modifier = DifficultyModifier::try_from(modifier)?;

    let pool: Vec<Question> = parser::load_banks(&bank_path)?
        .into_iter()
        .flat_map(|b| b.questions)
        .collect();
    tracing::debug!(pool = pool.len(), path = %bank_path.display(), "loaded question pool");

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let picked = select_questions(&pool, grade, modifier, count, &mut rng);

    println!(
        "Grade {} (band {}), modifier {}, target difficulty {}, time limit {}s",
        grade,
        grade.band(),
        modifier,
        target_difficulty(grade, modifier),
        adjusted_time_limit(None, grade, modifier)
    );

    print_questions(&picked);

    if picked.len() < count {
        println!(
            "\nOnly {} of {} requested questions available.",
            picked.len(),
            count
        );
    }

    Ok(())
}

fn print_questions(questions: &[Question]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["ID", "Band", "Difficulty", "Kind", "Prompt"]);

    for q in questions {
        table.add_row(vec![
            Cell::new(&q.id),
            Cell::new(&q.grade_band),
            Cell::new(q.difficulty_level),
            Cell::new(format!("{:?}", q.kind).to_lowercase()),
            Cell::new(&q.prompt),
        ]);
    }

    println!("\n{table}");
}
