use clap::{Args, Parser, Subcommand, ValueEnum};
use std::error::Error;
use tracing_subscriber::{fmt, EnvFilter};

use aerofoil_lift::constants::DEFAULT_SAMPLE_COUNT;
use aerofoil_lift::{run, LiftReport, MeasurementSession, Measured, UncertaintyConfig, UncertaintyMode};

#[derive(Parser)]
#[command(name = "aerofoil-lift")]
#[command(version)]
#[command(about = "Lift per unit span from pitot-static aerofoil surveys", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate lift per unit span for the reference survey
    Compute {
        #[command(flatten)]
        run: RunArgs,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show pressure and lift contribution of every panel
    Panels {
        #[command(flatten)]
        run: RunArgs,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Display program information
    Info,
}

#[derive(Args)]
struct RunArgs {
    /// How measurement errors are propagated
    #[arg(short = 'u', long, value_enum, default_value = "gaussian")]
    uncertainty: UncertaintyArg,

    /// Monte Carlo samples per uncertain value
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Stream fluid density (kg/m³); keeps the recorded error
    #[arg(long)]
    stream_density: Option<f64>,

    /// Manometer fluid density (kg/m³); keeps the recorded error
    #[arg(long)]
    manometer_density: Option<f64>,

    /// Gravitational acceleration (m/s²); keeps the recorded error
    #[arg(long)]
    g: Option<f64>,

    /// Tube-angle correction factor; keeps the recorded error
    #[arg(long)]
    tube_angle_adjust: Option<f64>,

    /// Freestream height difference (m); keeps the recorded error
    #[arg(long)]
    freestream_height: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UncertaintyArg {
    None,
    Gaussian,
    Uniform,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl RunArgs {
    fn config(&self) -> UncertaintyConfig {
        let mode = match self.uncertainty {
            UncertaintyArg::None => UncertaintyMode::None,
            UncertaintyArg::Gaussian => UncertaintyMode::Gaussian,
            UncertaintyArg::Uniform => UncertaintyMode::Uniform,
        };
        UncertaintyConfig {
            mode,
            samples: self.samples,
            seed: self.seed,
        }
    }

    fn session(&self) -> MeasurementSession {
        fn set(target: &mut Measured, value: Option<f64>) {
            if let Some(v) = value {
                target.value = v;
            }
        }

        let mut session = MeasurementSession::reference_aerofoil();
        let p = &mut session.parameters;
        set(&mut p.stream_fluid_density, self.stream_density);
        set(&mut p.pitot_static_fluid_density, self.manometer_density);
        set(&mut p.g, self.g);
        set(&mut p.tube_angle_adjust, self.tube_angle_adjust);
        set(&mut p.airflow_pitot_static_height_difference, self.freestream_height);
        session
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Commands::Compute { run: args, output } => {
            let report = run(&args.config(), &args.session())?;
            display_lift(&report, output)?;
        }

        Commands::Panels { run: args, output } => {
            let report = run(&args.config(), &args.session())?;
            display_panels(&report, output)?;
        }

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║      AEROFOIL LIFT v{:<19}║", env!("CARGO_PKG_VERSION"));
            println!("╠════════════════════════════════════════╣");
            println!("║ Lift per unit span from pitot-static   ║");
            println!("║ surveys around an aerofoil section.    ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Features:                              ║");
            println!("║ • Bernoulli pitot-static velocities    ║");
            println!("║ • Panel pressure integration           ║");
            println!("║ • Monte Carlo error propagation        ║");
            println!("║ • Gaussian or uniform reading errors   ║");
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn mode_name(mode: UncertaintyMode) -> &'static str {
    match mode {
        UncertaintyMode::None => "none",
        UncertaintyMode::Gaussian => "gaussian",
        UncertaintyMode::Uniform => "uniform",
    }
}

fn display_lift(report: &LiftReport, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let lift = &report.lift_per_unit_length;
    match format {
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║         LIFT PER UNIT SPAN             ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Uncertainty:       {:>8}            ║", mode_name(report.uncertainty.mode));
            println!("║ Panels:            {:>8}            ║", report.panels.len());
            println!("╠════════════════════════════════════════╣");
            println!("║ Lift:              {:>8.4} N/m        ║", lift.mean);
            println!("║ Std Dev:           {:>8.4} N/m        ║", lift.std_dev);
            println!("║ 5th pct:           {:>8.4} N/m        ║", lift.p05);
            println!("║ 95th pct:          {:>8.4} N/m        ║", lift.p95);
            println!("╚════════════════════════════════════════╝");
            println!("\nLift is {:.6} -+ {:.6}", lift.mean, lift.std_dev);
        }

        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }

        OutputFormat::Csv => {
            println!("metric,value");
            println!("uncertainty,{}", mode_name(report.uncertainty.mode));
            println!("panels,{}", report.panels.len());
            println!("lift_mean,{:.6}", lift.mean);
            println!("lift_std_dev,{:.6}", lift.std_dev);
            println!("lift_p05,{:.6}", lift.p05);
            println!("lift_p95,{:.6}", lift.p95);
        }
    }

    Ok(())
}

fn display_panels(report: &LiftReport, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Table => {
            println!("┌──────┬──────────┬──────────┬────────────────────┬────────────────────┐");
            println!("│ Panel│ Angle(r) │ Length(m)│   Pressure (Pa)    │  Lift (N/m)        │");
            println!("├──────┼──────────┼──────────┼────────────────────┼────────────────────┤");
            for p in &report.panels {
                println!(
                    "│ {:>4} │ {:>8.3} │ {:>8.3} │ {:>8.3} ± {:<7.3} │ {:>8.4} ± {:<7.4} │",
                    p.index,
                    p.angle_between_normal_and_vertical,
                    p.section_length,
                    p.pressure.mean,
                    p.pressure.std_dev,
                    p.lift_contribution.mean,
                    p.lift_contribution.std_dev
                );
            }
            println!("└──────┴──────────┴──────────┴────────────────────┴────────────────────┘");
            println!(
                "Total lift: {:.4} ± {:.4} N/m",
                report.lift_per_unit_length.mean, report.lift_per_unit_length.std_dev
            );
        }

        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report.panels)?);
        }

        OutputFormat::Csv => {
            println!("panel,angle,section_length,pressure,pressure_std_dev,lift,lift_std_dev");
            for p in &report.panels {
                println!(
                    "{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
                    p.index,
                    p.angle_between_normal_and_vertical,
                    p.section_length,
                    p.pressure.mean,
                    p.pressure.std_dev,
                    p.lift_contribution.mean,
                    p.lift_contribution.std_dev
                );
            }
        }
    }

    Ok(())
}
