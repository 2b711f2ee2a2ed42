extern crate habitual as lib;

use chrono::{Local, NaiveDate};
use flexi_logger::{FileSpec, Logger};
use lib::analytics::MetricAnalytics;
use lib::calendar::CalendarMonth;
use lib::config::Config;
use lib::growth::GrowthProjector;
use lib::render::{MonthGrid, ProjectionCard};
use lib::store::Snapshot;
use lib::{Error, ErrorKind};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "hb",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Habitual - habit calendars and metric projections."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "d",
        long = "data",
        help = "habit snapshot to read (overrides the config)",
        parse(from_os_str)
    )]
    pub data: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "list all habits")]
    List,

    #[structopt(about = "show the calendar of a month")]
    Calendar {
        #[structopt(help = "habit whose completed days are marked")]
        habit: Option<String>,

        #[structopt(short = "m", long = "month", help = "month as YYYY-MM [default: current]")]
        month: Option<CalendarMonth>,
    },

    #[structopt(about = "show metric analytics and projections of a habit")]
    Project {
        habit: String,

        #[structopt(long = "as-of", help = "reference date as YYYY-MM-DD [default: today]")]
        as_of: Option<NaiveDate>,
    },
}

fn load_snapshot(args: &Args, config: &Config) -> Result<Snapshot, Error> {
    let path = args.data.as_ref().or_else(|| config.data.as_ref()).ok_or_else(|| {
        Error::new(
            ErrorKind::SnapshotParse,
            "no snapshot given, use --data or set 'data' in the config",
        )
    })?;

    Snapshot::from_path(path)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file.clone())?)
            .print_message();
    }

    let _logger = logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let today = Local::now().date_naive();

    match &args.cmd {
        Command::List => {
            let snapshot = load_snapshot(&args, &config)?;

            for habit in snapshot.all_habits() {
                let system = snapshot
                    .system_of(habit)
                    .map_or(String::new(), |s| format!(" [{}]", s.name));

                println!("{} {} ({}){}", habit.color, habit.name, habit.id, system);
            }
        }
        Command::Calendar { habit, month } => {
            let month = month.unwrap_or_else(|| CalendarMonth::from(today));

            let grid = match habit {
                Some(key) => {
                    let snapshot = load_snapshot(&args, &config)?;
                    let habit = snapshot.habit(key)?;
                    let grid = MonthGrid::new(month, config.week_start, habit, &config.theme)
                        .today(today);

                    println!("{}", habit.name);
                    log::debug!("{} completed day(s) in {}", grid.completed_days(), month);
                    grid.to_string()
                }
                None => {
                    let nothing = |_: NaiveDate| false;
                    MonthGrid::new(month, config.week_start, &nothing, &config.theme)
                        .today(today)
                        .to_string()
                }
            };

            print!("{}", grid);
        }
        Command::Project { habit, as_of } => {
            let as_of = as_of.unwrap_or(today);
            let snapshot = load_snapshot(&args, &config)?;
            let habit = snapshot.habit(habit)?;

            let metric = match &habit.metric {
                Some(metric) => metric,
                None => {
                    log::warn!("Habit '{}' does not track a metric", habit.id);
                    println!("{} does not track a metric.", habit.name);
                    return Ok(());
                }
            };

            let analytics = MetricAnalytics::new(&habit.metrics, metric, as_of);
            let projector = GrowthProjector::new(&config.horizons);

            print!("{}", ProjectionCard::new(&analytics, &projector, as_of));
        }
    }

    Ok(())
}
