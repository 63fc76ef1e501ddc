use chrono::Utc;
use clap::{Parser, Subcommand};
use irontrack_core::*;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "irontrack")]
#[command(about = "IronTrack strength-training routine and session tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User key the document is stored under
    #[arg(long, global = true, default_value = "default")]
    user: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active routine and what the next session will be (default)
    Status,

    /// Create a sample ABC routine from the default exercise library
    Seed,

    /// List routines
    Routines,

    /// Mark a routine as active
    Activate {
        /// Routine id (see `routines`)
        routine_id: String,
    },

    /// Run a workout session for the next split
    Start {
        /// Mark every seeded set complete and finish without prompting
        #[arg(long)]
        auto_complete: bool,
    },

    /// Show the max-weight progress series for an exercise
    Progress {
        /// Library exercise id (e.g. def_07)
        exercise_id: String,

        /// How many recent sessions to show
        #[arg(long, default_value_t = 10)]
        points: usize,
    },

    /// Ask the IronCoach a question about the next workout
    Coach {
        /// The question, in your own words
        query: Vec<String>,
    },
}

fn main() -> Result<()> {
    irontrack_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = Store::new(&data_dir);
    let user = cli.user;

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&store, &user),
        Some(Commands::Seed) => cmd_seed(&store, &user),
        Some(Commands::Routines) => cmd_routines(&store, &user),
        Some(Commands::Activate { routine_id }) => cmd_activate(&store, &user, &routine_id),
        Some(Commands::Start { auto_complete }) => cmd_start(&store, &user, &config, auto_complete),
        Some(Commands::Progress {
            exercise_id,
            points,
        }) => cmd_progress(&store, &user, &exercise_id, points),
        Some(Commands::Coach { query }) => cmd_coach(&store, &user, &config, &query.join(" ")),
    }
}

fn cmd_status(store: &Store, user: &str) -> Result<()> {
    let doc = store.load(user)?;

    match doc.active_routine() {
        Some(routine) => {
            println!("Rotina ativa: {} ({})", routine.name, routine.id);
            match routine.current_split() {
                Some(split) => {
                    println!("Próximo treino: {} ({} exercícios)", split.name, split.exercises.len());
                    for entry in &split.exercises {
                        println!(
                            "  - {} {}x{} (descanso {}s)",
                            exercise_name(&doc.exercises, &entry.exercise_id),
                            entry.target_sets,
                            entry.target_reps,
                            entry.rest_time_seconds,
                        );
                    }
                }
                None => println!("A rotina não tem divisões; adicione uma para poder treinar."),
            }
        }
        None => println!("Nenhuma rotina ativa. Use `irontrack seed` para criar uma de exemplo."),
    }
    println!("Treinos registrados: {}", doc.logs.len());
    Ok(())
}

fn cmd_seed(store: &Store, user: &str) -> Result<()> {
    const SEED_NAME: &str = "ABC Hipertrofia";

    let doc = store.load(user)?;
    if doc.routines.iter().any(|r| r.name == SEED_NAME) {
        println!("Rotina \"{}\" já existe - nada a fazer.", SEED_NAME);
        return Ok(());
    }

    let mut routine = Routine::new(SEED_NAME);
    let plan: [(&str, &[&str]); 3] = [
        ("A", &["def_01", "def_02", "def_16"]),
        ("B", &["def_04", "def_05", "def_14"]),
        ("C", &["def_07", "def_08", "def_13"]),
    ];
    for (name, exercise_ids) in plan {
        let split = routine.add_split(name);
        for id in exercise_ids {
            split.add_exercise(&doc.exercises, id);
        }
    }

    let next = save_routine(&doc, routine)?;
    store.save(user, &next)?;
    println!("✓ Rotina \"{}\" criada e ativada.", SEED_NAME);
    Ok(())
}

fn cmd_routines(store: &Store, user: &str) -> Result<()> {
    let doc = store.load(user)?;
    if doc.routines.is_empty() {
        println!("Nenhuma rotina criada.");
        return Ok(());
    }

    for routine in &doc.routines {
        let marker = if doc.active_routine_id.as_deref() == Some(routine.id.as_str()) {
            " [ATIVA]"
        } else {
            ""
        };
        println!("{}{}  ({})", routine.name, marker, routine.id);
        for (i, split) in routine.splits.iter().enumerate() {
            let next = if i == routine.current_split_index {
                " ← próximo"
            } else {
                ""
            };
            println!("    {} - {} exercícios{}", split.name, split.exercises.len(), next);
        }
    }
    Ok(())
}

fn cmd_activate(store: &Store, user: &str, routine_id: &str) -> Result<()> {
    let doc = store.load(user)?;
    if !doc.routines.iter().any(|r| r.id == routine_id) {
        println!("Rotina {} não encontrada.", routine_id);
        return Ok(());
    }
    let next = set_active_routine(&doc, routine_id);
    store.save(user, &next)?;
    println!("✓ Rotina ativada.");
    Ok(())
}

fn cmd_start(store: &Store, user: &str, config: &Config, auto_complete: bool) -> Result<()> {
    let doc = store.load(user)?;

    let mut session = match WorkoutSession::start_with_config(&doc, &config.session) {
        Ok(session) => session,
        Err(Error::Session(msg)) => {
            println!("Não foi possível iniciar o treino: {}.", msg);
            println!("Use `irontrack seed` ou `irontrack activate` primeiro.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("Treino {} em andamento", session.split().name);

    if auto_complete {
        let entries: Vec<(String, usize)> = session
            .split()
            .exercises
            .iter()
            .map(|e| (e.id.clone(), session.sets(&e.id).len()))
            .collect();
        for (entry_id, count) in entries {
            for i in 0..count {
                session.toggle_complete(&entry_id, i);
            }
        }
        return finish_session(store, user, &doc, session);
    }

    run_interactive_session(store, user, doc, session)
}

/// Interactive loop. The rest countdown runs on wall-clock time: elapsed
/// seconds since the previous prompt are applied as ticks before each new
/// prompt, so timer state only ever changes between commands.
fn run_interactive_session(
    store: &Store,
    user: &str,
    doc: Document,
    mut session: WorkoutSession,
) -> Result<()> {
    let mut last_prompt = Instant::now();

    loop {
        let elapsed = last_prompt.elapsed().as_secs();
        for _ in 0..elapsed {
            session.tick_rest();
        }
        last_prompt = Instant::now();

        print_session(&doc, &session);
        println!("Comandos: c EX SET (concluir) | w EX SET KG | r EX SET REPS");
        println!("          a EX (+série) | d EX SET (-série) | s (pular descanso)");
        println!("          f (finalizar) | q (cancelar)");
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let tokens: Vec<&str> = input.split_whitespace().collect();

        match tokens.as_slice() {
            ["f"] => return finish_session(store, user, &doc, session),
            ["q"] => {
                session.cancel();
                println!("Treino cancelado. Nada foi salvo.");
                return Ok(());
            }
            ["s"] => session.skip_rest(),
            ["c", ex, set] => {
                if let Some((entry_id, index)) = resolve(&session, ex, set) {
                    session.toggle_complete(&entry_id, index);
                }
            }
            ["w", ex, set, kg] => {
                if let (Some((entry_id, index)), Ok(weight)) =
                    (resolve(&session, ex, set), kg.parse::<f64>())
                {
                    session.set_weight(&entry_id, index, weight);
                }
            }
            ["r", ex, set, reps] => {
                if let Some((entry_id, index)) = resolve(&session, ex, set) {
                    session.set_reps(&entry_id, index, *reps);
                }
            }
            ["a", ex] => {
                if let Some(entry_id) = resolve_exercise(&session, ex) {
                    session.add_set(&entry_id);
                }
            }
            ["d", ex, set] => {
                if let Some((entry_id, index)) = resolve(&session, ex, set) {
                    session.remove_set(&entry_id, index);
                }
            }
            [] => {}
            _ => println!("Comando não reconhecido."),
        }
    }
}

fn finish_session(store: &Store, user: &str, doc: &Document, session: WorkoutSession) -> Result<()> {
    let outcome = session.finish(&doc.exercises, Utc::now());
    let logged = outcome.log.exercises.len();
    let split_name = outcome.log.split_name.clone();
    let next = doc.apply_session(outcome);
    store.save(user, &next)?;

    println!("✓ Treino {} finalizado: {} exercícios registrados.", split_name, logged);
    if let Some(routine) = next.active_routine() {
        if let Some(split) = routine.current_split() {
            println!("  Próximo treino: {}", split.name);
        }
    }
    Ok(())
}

fn print_session(doc: &Document, session: &WorkoutSession) {
    println!();
    for (i, entry) in session.split().exercises.iter().enumerate() {
        let sets = session.sets(&entry.id);
        let done = sets.iter().filter(|s| s.completed).count();
        println!(
            "[{}] {} - {}/{} séries",
            i + 1,
            exercise_name(&doc.exercises, &entry.exercise_id),
            done,
            sets.len(),
        );
        for (j, set) in sets.iter().enumerate() {
            let mark = if set.completed { "✓" } else { " " };
            println!("    {} {}. {} x {}kg", mark, j + 1, set.reps, set.weight);
        }
    }
    if let Some(timer) = session.rest_timer() {
        println!("Descanso: {}s restantes (de {}s)", timer.remaining, timer.total);
    }
    println!();
}

/// Map 1-based "EX SET" tokens onto a routine-exercise id and set index
fn resolve(session: &WorkoutSession, ex: &str, set: &str) -> Option<(String, usize)> {
    let entry_id = resolve_exercise(session, ex)?;
    let set_number: usize = set.parse().ok().filter(|&n| n >= 1)?;
    Some((entry_id, set_number - 1))
}

fn resolve_exercise(session: &WorkoutSession, ex: &str) -> Option<String> {
    let number: usize = ex.parse().ok().filter(|&n| n >= 1)?;
    session
        .split()
        .exercises
        .get(number - 1)
        .map(|e| e.id.clone())
}

fn cmd_progress(store: &Store, user: &str, exercise_id: &str, points: usize) -> Result<()> {
    let doc = store.load(user)?;
    let name = exercise_name(&doc.exercises, exercise_id);
    let series = recent_progress(&doc.logs, exercise_id, points);

    if series.is_empty() {
        println!("Nenhum registro para {} ainda.", name);
        return Ok(());
    }

    println!("Progresso - {}:", name);
    for point in series {
        println!("  {}  {}kg", point.date.format("%Y-%m-%d"), point.max_weight);
    }
    Ok(())
}

fn cmd_coach(store: &Store, user: &str, config: &Config, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        println!("Escreva sua pergunta: irontrack coach \"como agachar?\"");
        return Ok(());
    }

    let doc = store.load(user)?;
    let context = match WorkoutSession::start_with_config(&doc, &config.session) {
        Ok(session) => session.coach_context(&doc.exercises),
        Err(_) => "Sem treino ativo.".to_string(),
    };

    let answer = match GeminiCoach::from_config(&config.coach) {
        Some(coach) => coach.ask(query, &context),
        None => COACH_FAILURE_MESSAGE.to_string(),
    };
    println!("{}", answer);
    Ok(())
}
