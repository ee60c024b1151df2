//! war-room: headless runner for Last War.
//!
//! Usage:
//!   war-room --seed 12345 --ticks 600 --db lastwar.db
//!   war-room --seed 12345 --ipc-mode --narrator field-manual
//!
//! IPC lines look like `{"type":"command","cmd":"train","unit_id":"u1"}`.

use anyhow::Result;
use lastwar_core::{
    building::Building,
    command::PlayerCommand,
    config::GameConfig,
    engine::GameEngine,
    event::GameEvent,
    mission::Mission,
    narrative::{FieldManual, Narrator, Offline},
    resources::{describe_bundle, Bundle, Resources},
    store::GameStore,
    types::Tick,
    unit::Unit,
};
use std::env;
use std::io::{self, BufRead, Write};

/// Lines of journal included in each UI state reply.
const LOG_HEAD: usize = 10;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Command(PlayerCommand),
    Quit,
}

#[derive(serde::Serialize)]
struct BuildingView {
    #[serde(flatten)]
    building:     Building,
    upgrade_cost: Bundle,
}

#[derive(serde::Serialize)]
struct UiState {
    day:          u32,
    tick:         Tick,
    resources:    Resources,
    combat_power: u64,
    buildings:    Vec<BuildingView>,
    units:        Vec<Unit>,
    missions:     Vec<Mission>,
    log:          Vec<String>,
    events:       Vec<GameEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 600u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let narrator_name = flag_value(&args, "--narrator").unwrap_or("offline");

    if !ipc_mode {
        println!("Last War: war-room");
        println!("  started:   {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  narrator:  {narrator_name}");
        println!();
    }

    let config = match GameConfig::load(data_dir) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{e:#}; using the built-in catalog");
            GameConfig::default()
        }
    };
    let narrator: Box<dyn Narrator> = match narrator_name {
        "field-manual" => Box::new(FieldManual),
        "offline" => Box::new(Offline),
        other => anyhow::bail!("unknown narrator '{other}' (expected offline or field-manual)"),
    };

    let store = GameStore::open(db)?;
    store.migrate()?;
    let mut engine = GameEngine::boot(config, seed, store, narrator)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        engine.run_ticks(ticks)?;
        engine.await_scan()?;
        print_summary(&engine, ticks)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                reply_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => engine.poll_scan()?,
            IpcCommand::Tick { count } => {
                let mut events = Vec::new();
                for _ in 0..count {
                    events.extend(engine.tick()?);
                }
                events
            }
            IpcCommand::Command(command) => match engine.apply(command) {
                Ok(events) => events,
                Err(e) => {
                    reply_error(&mut stdout, &e.to_string())?;
                    continue;
                }
            },
        };
        let state = build_ui_state(engine, events);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn reply_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()?;
    Ok(())
}

fn build_ui_state(engine: &GameEngine, events: Vec<GameEvent>) -> UiState {
    let state = engine.state();
    UiState {
        day:          state.day,
        tick:         engine.clock.current_tick,
        resources:    state.resources,
        combat_power: state.total_power(),
        buildings:    state
            .buildings
            .iter()
            .map(|b| BuildingView {
                building:     b.clone(),
                upgrade_cost: b.upgrade_cost(),
            })
            .collect(),
        units:        state.units.clone(),
        missions:     engine.missions.offers().to_vec(),
        log:          state.log.entries().iter().take(LOG_HEAD).cloned().collect(),
        events,
    }
}

fn print_summary(engine: &GameEngine, ticks: u64) -> Result<()> {
    let state = engine.state();

    println!("=== RUN SUMMARY ===");
    println!("  session:        {}", engine.session_id);
    println!("  ticks run:      {ticks}");
    println!("  final tick:     {}", engine.clock.current_tick);
    println!("  day:            {}", state.day);
    println!("  resources:      {}", state.resources);
    println!("  combat power:   {}", state.total_power());
    println!("  productions:    {}", engine.event_count("production_applied")?);
    println!("  missions live:  {}", engine.missions.len());

    println!();
    println!("=== INFRASTRUCTURE ===");
    for b in &state.buildings {
        println!(
            "  {:<18} Lv.{:<3} next: {}",
            b.name,
            b.level,
            describe_bundle(&b.upgrade_cost())
        );
    }

    println!();
    println!("=== MISSION BOARD ===");
    for m in engine.missions.offers() {
        println!(
            "  {:<28} diff {} enemy {:<5} {}",
            m.title,
            m.difficulty,
            m.enemy_power,
            describe_bundle(&m.rewards)
        );
    }

    println!();
    println!("=== JOURNAL (latest {LOG_HEAD}) ===");
    for line in state.log.entries().iter().take(LOG_HEAD) {
        println!("  {line}");
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
