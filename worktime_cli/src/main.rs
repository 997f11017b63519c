use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use worktime_core::format::{hours_minutes, minutes_to_hhmm, signed_hhmm, signed_minutes};
use worktime_core::*;

#[derive(Parser)]
#[command(name = "worktime")]
#[command(about = "Work-time tracker for weekly and monthly targets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Track by week or month (overrides config)
    #[arg(long, global = true)]
    mode: Option<PeriodKind>,

    /// Use this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current period (default)
    Show,

    /// Set clock-in and/or clock-out time for a day
    Set {
        /// Day number within the period (1-based)
        day: usize,

        /// Clock-in time (HH:MM)
        #[arg(long = "in")]
        clock_in: Option<ClockTime>,

        /// Clock-out time (HH:MM)
        #[arg(long = "out")]
        clock_out: Option<ClockTime>,
    },

    /// Clear both clock times of a day
    Clear { day: usize },

    /// Change the day-type of a day
    Type {
        day: usize,

        /// One of: work, fullLeave, halfLeave, quarterLeave, freeDinner, refreshDay, holiday
        day_type: DayType,
    },

    /// Edit the breaks of a day
    Break {
        #[command(subcommand)]
        action: BreakAction,
    },

    /// Export the current period to CSV
    Export { path: PathBuf },

    /// Delete all records of the current mode
    Reset,

    /// List day-types and their policies
    Types,

    /// Show the config file location
    Config {
        /// Write a config file with the default settings if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum BreakAction {
    /// Add a break (HH:MM HH:MM)
    Add {
        day: usize,
        start: ClockTime,
        end: ClockTime,
    },

    /// Remove a break by its position in the list (1-based)
    Remove { day: usize, position: usize },

    /// Restore the default breaks
    Reset { day: usize },
}

/// Everything a command needs to find and interpret the state
struct Session {
    config: Config,
    state_path: PathBuf,
    period: Period,
    today: NaiveDate,
}

impl Session {
    fn default_breaks(&self) -> &[BreakInterval] {
        &self.config.breaks.default
    }

    fn load(&self) -> Result<TrackerState> {
        TrackerState::load_for(&self.state_path, self.period, self.default_breaks())
    }

    fn update<F>(&self, f: F) -> Result<TrackerState>
    where
        F: FnOnce(&mut TrackerState) -> Result<()>,
    {
        TrackerState::update(&self.state_path, self.period, self.default_breaks(), f)
    }

    fn target_minutes(&self, state: &TrackerState) -> u32 {
        self.period.target_minutes(
            self.config.tracking.target,
            self.config.tracking.weekly_target_minutes,
            &state.records,
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    worktime_core::logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let kind = cli.mode.unwrap_or(config.tracking.mode);
    let today = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let session = Session {
        state_path: state_path(&data_dir, kind),
        period: Period::current(kind, today),
        today,
        config,
    };
    tracing::debug!(
        "Tracking {} in {:?} (today {})",
        session.period,
        session.state_path,
        session.today
    );

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => {
            let state = session.load()?;
            render(&session, &state);
        }
        Commands::Set {
            day,
            clock_in,
            clock_out,
        } => {
            if clock_in.is_none() && clock_out.is_none() {
                return Err(Error::Other(
                    "Nothing to set: pass --in and/or --out".into(),
                ));
            }
            let state = session.update(|state| {
                if let Some(time) = clock_in {
                    state.set_clock_in(day, time)?;
                }
                if let Some(time) = clock_out {
                    state.set_clock_out(day, time)?;
                }
                Ok(())
            })?;
            render(&session, &state);
        }
        Commands::Clear { day } => {
            let state = session.update(|state| state.clear_times(day))?;
            render(&session, &state);
        }
        Commands::Type { day, day_type } => {
            let breaks = session.default_breaks().to_vec();
            let state = session.update(|state| state.set_day_type(day, day_type, &breaks))?;
            render(&session, &state);
        }
        Commands::Break { action } => {
            let breaks = session.default_breaks().to_vec();
            let mut removed = None;
            let state = session.update(|state| match action {
                BreakAction::Add { day, start, end } => {
                    state.add_break(day, BreakInterval::new(start, end))
                }
                BreakAction::Remove { day, position } => {
                    removed = Some((state.remove_break(day, position)?, day));
                    Ok(())
                }
                BreakAction::Reset { day } => state.reset_breaks(day, &breaks),
            })?;
            if let Some((interval, day)) = removed {
                println!("Removed break {} from day {}", interval, day);
            }
            render(&session, &state);
        }
        Commands::Export { path } => {
            let state = session.load()?;
            let stats = state.stats(session.target_minutes(&state));
            let rows = export_period_csv(&path, &state, &stats)?;
            println!("✓ Exported {} days of {} to {}", rows, state.period, path.display());
        }
        Commands::Reset => {
            if TrackerState::reset(&session.state_path)? {
                println!("✓ Cleared records for {}", session.period);
            } else {
                println!("No records to clear.");
            }
        }
        Commands::Types => render_types(),
        Commands::Config { init } => {
            let path = Config::default_config_path();
            if !init {
                let status = if path.exists() { "" } else { " (not created, using defaults)" };
                println!("{}{}", path.display(), status);
            } else if path.exists() {
                println!("Config already exists at {}", path.display());
            } else {
                Config::default().save_to(&path)?;
                println!("✓ Wrote default config to {}", path.display());
            }
        }
    }

    Ok(())
}

fn state_path(data_dir: &Path, kind: PeriodKind) -> PathBuf {
    let name = match kind {
        PeriodKind::Week => "week_state.json",
        PeriodKind::Month => "month_state.json",
    };
    data_dir.join(name)
}

fn render(session: &Session, state: &TrackerState) {
    let target = session.target_minutes(state);
    let stats = state.stats(target);
    let today_index = state.period.day_index_of(session.today);

    println!();
    println!("  {}  (target {})", state.period, minutes_to_hhmm(i64::from(target)));
    println!();
    println!(
        "  {:>3}  {:<9}  {:<12}  {:<5}  {:<5}  {:<24}  {:>6}  {:>6}  {:>6}  {:>5}",
        "Day", "Date", "Type", "In", "Out", "Breaks", "Worked", "Bonus", "Total", "+/-"
    );

    for (record, day) in state.records.iter().zip(&stats.days) {
        let marker = if Some(record.day_index) == today_index { ">" } else { " " };
        let date = state
            .period
            .date_of(record.day_index)
            .map(|d| format!("{} {}", state.period.day_label(record.day_index), d.format("%m-%d")))
            .unwrap_or_default();
        if !state.period.is_tracked(record.day_index) {
            println!(
                "{} {:>3}  {:<9}  {:<12}  {:<5}  {:<5}  {:<24}  {:>6}  {:>6}  {:>6}  {:>5}",
                marker, record.day_index, date, "-", "-", "-", "-", "-", "-", "-", "-"
            );
            continue;
        }
        let off = policy_for(record.day_type).is_full_day_off;
        let time = |t: Option<ClockTime>| match t {
            Some(t) if !off => t.to_string(),
            _ => "-".to_string(),
        };
        let breaks = if off || record.breaks.is_empty() {
            "-".to_string()
        } else {
            record
                .breaks
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };

        println!(
            "{} {:>3}  {:<9}  {:<12}  {:<5}  {:<5}  {:<24}  {:>6}  {:>6}  {:>6}  {:>5}",
            marker,
            record.day_index,
            date,
            record.day_type.key(),
            time(record.clock_in),
            time(record.clock_out),
            breaks,
            minutes_to_hhmm(i64::from(day.worked_minutes)),
            minutes_to_hhmm(i64::from(day.bonus_minutes)),
            minutes_to_hhmm(i64::from(day.total_minutes)),
            signed_minutes(day.plus_minus),
        );
    }

    println!();
    println!("  Worked:      {}", minutes_to_hhmm(i64::from(stats.worked_minutes)));
    println!("  Breaks:      {}", minutes_to_hhmm(i64::from(stats.break_minutes)));
    println!("  Bonus:       {}", minutes_to_hhmm(i64::from(stats.bonus_minutes)));
    println!("  Total:       {}", minutes_to_hhmm(i64::from(stats.total_minutes)));
    println!("  Target:      {}", minutes_to_hhmm(i64::from(stats.target_minutes)));
    println!("  Difference:  {}", signed_hhmm(stats.difference_minutes));
    println!("  Plus/minus:  {} min", signed_minutes(stats.plus_minus_minutes));
    if stats.is_target_met() {
        println!("  Progress:    {:.1}% (target met)", stats.progress_percent());
    } else {
        println!(
            "  Progress:    {:.1}% ({} remaining)",
            stats.progress_percent(),
            hours_minutes(stats.remaining_minutes())
        );
    }
    println!();
}

fn render_types() {
    println!(
        "  {:<13}  {:<20}  {:>5}  {:>5}  {:>6}  {}",
        "Key", "Name", "Bonus", "Break", "Target", "Day off"
    );
    for day_type in DayType::ALL {
        let policy = policy_for(day_type);
        println!(
            "  {:<13}  {:<20}  {:>5}  {:>5}  {:>6}  {}",
            day_type.key(),
            day_type.label(),
            policy.bonus_minutes,
            policy.fixed_break_minutes,
            policy.target_minutes,
            if policy.is_full_day_off { "yes" } else { "no" }
        );
    }
}
