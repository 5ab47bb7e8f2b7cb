//! Delve Engine - headless dungeon run.
//!
//! Resumes a saved run if one is consistent, otherwise enters the most
//! advanced unlocked dungeon with a demo party and plays it to the end.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delve_domain::{Character, CharacterStats, DomainError, LogTone, RunEvent};
use delve_engine::app::{App, AppPorts};
use delve_engine::infrastructure::{
    auto_battle::AutoBattleResolver,
    clock::{SystemClock, SystemRandom},
    event_sink::ChannelEventSink,
    memory::{InMemoryCharacters, InMemoryInventory},
    pacing::TokioPacer,
    persistence::JsonFileStore,
    ports::RandomPort,
    settings::EngineSettings,
    template_loader::load_template_store,
};
use delve_engine::use_cases::dungeon::{RunOutcome, SessionRestore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delve_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Delve Engine");

    let settings = EngineSettings::from_env();
    tracing::info!(
        pacing_ms = settings.pacing_interval.as_millis() as u64,
        save_dir = %settings.save_dir.display(),
        data_dir = %settings.data_dir.display(),
        "Settings loaded"
    );

    let templates = Arc::new(load_template_store(&settings.data_dir));
    let characters = Arc::new(InMemoryCharacters::with_team("Vanguard", demo_party()?));
    let inventory = Arc::new(InMemoryInventory::new());
    let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());

    let (events, mut receiver) = ChannelEventSink::new();
    let printer = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            render(&event);
        }
    });

    let app = App::new(
        templates,
        AppPorts {
            characters: characters.clone(),
            inventory: inventory.clone(),
            store: Arc::new(JsonFileStore::new(settings.save_dir.clone())),
            combat: Arc::new(AutoBattleResolver::new(characters.clone(), random.clone())),
            pacer: Arc::new(TokioPacer::new(settings.pacing_interval)),
            events: Arc::new(events),
            clock: Arc::new(SystemClock::new()),
            random,
        },
    );
    let runner = app.runner().clone();

    let outcome = match runner.restore_session().await? {
        SessionRestore::Resumed {
            dungeon_id,
            progress,
        } => {
            tracing::info!(dungeon_id = %dungeon_id, progress = progress.value(), "Resuming saved run");
            runner.drive().await?
        }
        restore => {
            tracing::debug!(restore = ?restore, "No run to resume");
            let Some(dungeon) = runner.available_dungeons()?.into_iter().last() else {
                anyhow::bail!("No dungeon is available to enter");
            };
            runner.start(&dungeon.template.id).await?
        }
    };

    match &outcome {
        RunOutcome::Completed(summary) => {
            println!(
                "\n{} finished: {} EXP, {} kinds of loot, {} gold bonus",
                summary.dungeon_name,
                summary.experience,
                summary.rewards.len(),
                summary.gold_awarded
            );
            if let Some(next) = &summary.unlocked {
                println!("Unlocked: {}", next);
            }
        }
        RunOutcome::Failed(record) => {
            println!(
                "\nDefeated on floor {} of {} by {} ({})",
                record.floor, record.dungeon_name, record.monster_name, record.defeat_reason
            );
        }
        RunOutcome::Paused | RunOutcome::Interrupted => {
            println!("\nRun stopped before it finished");
        }
    }
    println!("Gold on hand: {}", inventory.gold());

    // The printer ends once every event sender is gone.
    drop(runner);
    drop(app);
    printer.await?;
    Ok(())
}

fn demo_party() -> Result<Vec<Character>, DomainError> {
    Ok(vec![
        Character::new("Aldric", CharacterStats::new(420, 55, 24, 11))?,
        Character::new("Brina", CharacterStats::new(300, 72, 12, 16))?,
        Character::new("Corwin", CharacterStats::new(360, 48, 30, 9))?,
        Character::new("Dessa", CharacterStats::new(280, 64, 14, 18))?,
    ])
}

fn render(event: &RunEvent) {
    match event {
        RunEvent::BattleLog { message, tone } => {
            let marker = match tone {
                LogTone::Info => " ",
                LogTone::Success => "+",
                LogTone::Warning => "!",
                LogTone::Danger => "x",
            };
            println!("[{}] {}", marker, message);
        }
        RunEvent::ProgressUpdated { progress, .. } => println!("    progress {}", progress),
        _ => {}
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Local overrides win.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
