use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::path::{Path, PathBuf};
use swingtrader::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swingtrader")]
#[command(about = "A single-asset swing-trading backtester", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //path to csv data file (timestamp,open,high,low,close,volume)
        #[arg(long)]
        data: PathBuf,

        //json configuration file, missing keys take their defaults
        #[arg(long)]
        config: Option<PathBuf>,

        //fast sma period
        #[arg(long)]
        fast: Option<usize>,

        //slow sma period
        #[arg(long)]
        slow: Option<usize>,

        //starting cash
        #[arg(long)]
        cash: Option<f64>,

        //output path for trades csv
        #[arg(long)]
        output_trades_csv: Option<PathBuf>,

        //output path for equity curve csv
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,
    },

    //run one backtest per fast/slow pair in parallel
    Sweep {
        #[arg(long)]
        data: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        //comma separated fast periods
        #[arg(long, value_delimiter = ',', required = true)]
        fast: Vec<usize>,

        //comma separated slow periods
        #[arg(long, value_delimiter = ',', required = true)]
        slow: Vec<usize>,
    },
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            config,
            fast,
            slow,
            cash,
            output_trades_csv,
            output_equity_csv,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(fast) = fast {
                config.fast_ma_period = fast;
            }
            if let Some(slow) = slow {
                config.slow_ma_period = slow;
            }
            if let Some(cash) = cash {
                config.starting_cash = cash;
            }
            run(&data, config, output_trades_csv, output_equity_csv)?;
        }
        Commands::Sweep {
            data,
            config,
            fast,
            slow,
        } => {
            let config = load_config(config.as_deref())?;
            sweep(&data, config, &fast, &slow)?;
        }
    }

    Ok(())
}

fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swingtrader=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&Path>) -> Result<SwingConfig> {
    match path {
        Some(path) => SwingConfig::from_json_file(path),
        None => Ok(SwingConfig::default()),
    }
}

fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let bars = load_csv(path).context(format!("Failed to load data from {:?}", path))?;
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        tracing::info!(
            bars = bars.len(),
            from = %first.timestamp,
            to = %last.timestamp,
            "Loaded bars"
        );
    }
    Ok(bars)
}

fn run(
    data: &Path,
    config: SwingConfig,
    output_trades_csv: Option<PathBuf>,
    output_equity_csv: Option<PathBuf>,
) -> Result<()> {
    let bars = load_bars(data)?;
    let result = run_backtest(config, bars)?;

    println!("Backtest Results");
    println!("================\n");
    result.summary.pretty_print_table();

    if let Some(position) = &result.open_position {
        println!(
            "\nOpen position (unrealized): {} @ {:.2}",
            position.quantity, position.entry_price
        );
    }

    if let Some(path) = output_trades_csv {
        write_csv(&result.trades, &path)?;
        println!("Trades saved to {:?}", path);
    }

    if let Some(path) = output_equity_csv {
        write_csv(&result.equity_curve, &path)?;
        println!("Equity curve saved to {:?}", path);
    }

    Ok(())
}

fn sweep(data: &Path, base: SwingConfig, fast: &[usize], slow: &[usize]) -> Result<()> {
    let bars = load_bars(data)?;

    let configs: Vec<SwingConfig> = fast
        .iter()
        .flat_map(|&f| {
            let base = base.clone();
            slow.iter().map(move |&s| SwingConfig {
                fast_ma_period: f,
                slow_ma_period: s,
                ..base.clone()
            })
        })
        .collect();

    let results = run_sweep(&bars, &configs);

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Fast"),
        Cell::new("Slow"),
        Cell::new("PnL"),
        Cell::new("Sharpe"),
        Cell::new("Trades"),
    ]));

    for (config, result) in configs.iter().zip(results) {
        let (pnl, sharpe, trades) = match result {
            Ok(r) => (
                format!("${:.2}", r.summary.pnl),
                r.summary
                    .sharpe_ratio
                    .map_or_else(|| "undefined".to_string(), |s| format!("{:.3}", s)),
                r.summary.num_trades.to_string(),
            ),
            Err(e) => (e.to_string(), "-".to_string(), "-".to_string()),
        };
        table.add_row(Row::new(vec![
            Cell::new(&config.fast_ma_period.to_string()),
            Cell::new(&config.slow_ma_period.to_string()),
            Cell::new(&pnl),
            Cell::new(&sharpe),
            Cell::new(&trades),
        ]));
    }

    table.printstd();
    Ok(())
}

fn write_csv<T: Serialize>(records: &[T], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
