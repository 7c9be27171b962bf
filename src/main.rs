use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{info, Level};

use queue_calc::exercises;
use queue_calc::logging::init_tracing;
use queue_calc::report::{render, Report};
use queue_calc::scenario::{load_scenarios, ModelKind, ModelParameters, Scenario};
use queue_calc::MMS;

#[derive(Parser)]
#[command(name = "queue_calc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Steady-state metrics of classic queueing models", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Output format of the results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// M/G/1: one server, general service time
    Mg1 {
        #[arg(long)]
        lambda: f64,
        #[arg(long)]
        mu: f64,
        /// Variance of the service time
        #[arg(long, conflicts_with = "distribution")]
        variance: Option<f64>,
        /// exponential, deterministic or poisson
        #[arg(long)]
        distribution: Option<String>,
    },

    /// M/G/1 with priority classes, each evaluated against the whole server load
    Mg1Priority {
        /// Arrival rate per class, highest priority first (e.g. 2,4,2)
        #[arg(long, value_delimiter = ',', required = true)]
        rates: Vec<f64>,
        #[arg(long)]
        mu: f64,
        #[arg(long, conflicts_with = "distribution")]
        variance: Option<f64>,
        #[arg(long)]
        distribution: Option<String>,
        #[arg(long)]
        preemptive: bool,
    },

    /// M/M/1 or M/M/s with unlimited waiting room
    Mm {
        #[arg(long)]
        lambda: f64,
        #[arg(long)]
        mu: f64,
        #[arg(short, long, default_value_t = 1)]
        servers: usize,
        /// Also print the probability of exactly n customers
        #[arg(short)]
        n: Option<usize>,
        /// Also print P(W > t) and P(Wq > t)
        #[arg(short)]
        t: Option<f64>,
    },

    /// M/M/1/K or M/M/s/K: at most K customers in the system
    Mmsk {
        #[arg(long)]
        lambda: f64,
        #[arg(long)]
        mu: f64,
        #[arg(short, long, default_value_t = 1)]
        servers: usize,
        #[arg(short = 'k', long)]
        capacity: usize,
    },

    /// M/M/1/N or M/M/s/N: finite calling population of N customers
    Mmsn {
        /// Arrival rate of a single customer
        #[arg(long)]
        lambda: f64,
        #[arg(long)]
        mu: f64,
        #[arg(short, long, default_value_t = 1)]
        servers: usize,
        #[arg(short = 'N', long)]
        population: usize,
    },

    /// M/M/1 with preemptive priority classes
    Priority {
        /// Arrival rate per class, highest priority first (e.g. 2,4,2)
        #[arg(long, value_delimiter = ',', required = true)]
        rates: Vec<f64>,
        #[arg(long)]
        mu: f64,
    },

    /// M/M/s (s <= 3) with priority classes sharing one service rate
    MmsPriority {
        /// Arrival rate per class, highest priority first (e.g. 2,4,2)
        #[arg(long, value_delimiter = ',', required = true)]
        rates: Vec<f64>,
        #[arg(long)]
        mu: f64,
        #[arg(short, long, default_value_t = 1)]
        servers: usize,
        /// Preempt lower classes (resume) instead of waiting for completion
        #[arg(long)]
        preemptive: bool,
    },

    /// Evaluate every scenario of a JSON file
    File {
        path: PathBuf,
    },

    /// Run the built-in exercise list and compare with the published answers
    Exercises,
}

fn emit(scenario: &Scenario, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render(scenario.build())),
        OutputFormat::Json => {
            let value = match scenario.evaluate() {
                Ok(result) => json!({ "name": scenario.name, "model": scenario.model, "result": result }),
                Err(e) => json!({ "name": scenario.name, "model": scenario.model, "error": e.to_string() }),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn cmd_mm(lambda: f64, mu: f64, servers: usize, n: Option<usize>, t: Option<f64>, format: OutputFormat) -> Result<()> {
    let params = ModelParameters {
        arrival_rate: Some(lambda),
        service_rate: Some(mu),
        server_count: Some(servers),
        ..Default::default()
    };
    emit(&Scenario::new("mm", ModelKind::Mm, params), format)?;

    if format == OutputFormat::Text && (n.is_some() || t.is_some()) {
        if let Ok(q) = MMS::new(lambda, mu, servers) {
            if let Some(n) = n {
                println!("{:<42} {:.4}", format!("Probability of {} in system (P{}):", n, n), q.state_probability(n));
            }
            if let Some(t) = t {
                match (q.prob_sojourn_exceeds(t), q.prob_wait_exceeds(t)) {
                    (Ok(pw), Ok(pwq)) => {
                        println!("{:<42} {:.4}", format!("P(W > {}):", t), pw);
                        println!("{:<42} {:.4}", format!("P(Wq > {}):", t), pwq);
                    },
                    (Err(e), _) | (_, Err(e)) => print!("{}", queue_calc::report::diagnostic(&e)),
                }
            }
        }
    }
    Ok(())
}

fn cmd_exercises(format: OutputFormat) -> Result<()> {
    let catalogue = exercises::catalogue();
    let mut mismatches = 0;

    for exercise in &catalogue {
        if format == OutputFormat::Json {
            emit(&exercise.scenario, format)?;
            continue;
        }

        println!("\n=== {} ===", exercise.scenario.name);
        match exercise.scenario.build() {
            Ok(model) => model.print_report(),
            Err(e) => print!("{}", queue_calc::report::diagnostic(&e)),
        }

        match exercise.check() {
            Ok(checks) => {
                for c in checks {
                    let status = if c.passed() { "ok" } else { mismatches += 1; "MISMATCH" };
                    match c.actual {
                        Some(a) => println!("  expected {} = {:.4}, got {:.4} [{}]", c.metric, c.expected, a, status),
                        None => println!("  expected {} = {:.4}, not reported [{}]", c.metric, c.expected, status),
                    }
                }
            },
            Err(e) => {
                mismatches += exercise.expected.len();
                print!("{}", queue_calc::report::diagnostic(&e));
            }
        }
    }

    info!(exercises = catalogue.len(), mismatches, "exercise list finished");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.log_json, level);

    let format = cli.format;
    match cli.command {
        Commands::Mg1 { lambda, mu, variance, distribution } => {
            let params = ModelParameters {
                arrival_rate: Some(lambda),
                service_rate: Some(mu),
                service_variance: variance,
                service_distribution: distribution,
                ..Default::default()
            };
            emit(&Scenario::new("mg1", ModelKind::Mg1, params), format)
        },
        Commands::Mg1Priority { rates, mu, variance, distribution, preemptive } => {
            let params = ModelParameters {
                service_rate: Some(mu),
                service_variance: variance,
                service_distribution: distribution,
                priority_arrival_rates: Some(rates),
                preemptive,
                ..Default::default()
            };
            emit(&Scenario::new("mg1-priority", ModelKind::Mg1Priority, params), format)
        },
        Commands::Mm { lambda, mu, servers, n, t } => cmd_mm(lambda, mu, servers, n, t, format),
        Commands::Mmsk { lambda, mu, servers, capacity } => {
            let params = ModelParameters {
                arrival_rate: Some(lambda),
                service_rate: Some(mu),
                server_count: Some(servers),
                system_capacity: Some(capacity),
                ..Default::default()
            };
            emit(&Scenario::new("mmsk", ModelKind::Mmsk, params), format)
        },
        Commands::Mmsn { lambda, mu, servers, population } => {
            let params = ModelParameters {
                arrival_rate: Some(lambda),
                service_rate: Some(mu),
                server_count: Some(servers),
                population_size: Some(population),
                ..Default::default()
            };
            emit(&Scenario::new("mmsn", ModelKind::Mmsn, params), format)
        },
        Commands::Priority { rates, mu } => {
            let params = ModelParameters {
                service_rate: Some(mu),
                priority_arrival_rates: Some(rates),
                ..Default::default()
            };
            emit(&Scenario::new("priority", ModelKind::Mm1Preemptive, params), format)
        },
        Commands::MmsPriority { rates, mu, servers, preemptive } => {
            let params = ModelParameters {
                service_rate: Some(mu),
                server_count: Some(servers),
                priority_arrival_rates: Some(rates),
                preemptive,
                ..Default::default()
            };
            emit(&Scenario::new("mms-priority", ModelKind::MmsPriority, params), format)
        },
        Commands::File { path } => {
            let scenarios = load_scenarios(&path)?;
            info!(count = scenarios.len(), path = %path.display(), "loaded scenarios");
            for scenario in &scenarios {
                if format == OutputFormat::Text {
                    println!("\n=== {} ===", scenario.name);
                }
                emit(scenario, format)?;
            }
            Ok(())
        },
        Commands::Exercises => cmd_exercises(format),
    }
}
