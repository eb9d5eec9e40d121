use stocks_exchange::{Exchange, ExchangeConfig};
use stocks_runner::{MarketReport, TradeFeedConfig, TradeFeedSimulator};

const DEFAULT_TRADES: usize = 10;

fn print_help() {
    eprintln!(
        r#"GBCE Demo - random trading session on a simple stocks exchange

USAGE:
    gbce-demo [OPTIONS]

OPTIONS:
    --config <PATH>     Load exchange and listings from a JSON file
    --trades <N>        Number of random trades to record (default: 10)
    --seed <N>          Seed the trade feed for a reproducible session
    --json              Print the market report as JSON
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: warn)

EXAMPLES:
    # Run with the sample GBCE listings
    gbce-demo

    # Reproducible session with 100 trades
    gbce-demo --trades 100 --seed 42
"#
    );
}

struct Options {
    config_path: Option<String>,
    trades: usize,
    seed: Option<u64>,
    json: bool,
}

fn parse_args() -> Result<Option<Options>, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        config_path: None,
        trades: DEFAULT_TRADES,
        seed: None,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(None),
            "--json" => options.json = true,
            flag @ ("--config" | "-c" | "--trades" | "-n" | "--seed") => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| format!("{} requires an argument", flag))?;
                match flag {
                    "--config" | "-c" => options.config_path = Some(value.clone()),
                    "--trades" | "-n" => {
                        options.trades = value
                            .parse()
                            .map_err(|e| format!("invalid --trades value {}: {}", value, e))?
                    }
                    _ => {
                        options.seed = Some(
                            value
                                .parse()
                                .map_err(|e| format!("invalid --seed value {}: {}", value, e))?,
                        )
                    }
                }
            }
            arg => return Err(format!("Unknown argument: {}", arg)),
        }
        i += 1;
    }

    Ok(Some(options))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = match parse_args() {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_help();
            return Ok(());
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            print_help();
            std::process::exit(1);
        }
    };

    let config = match &options.config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            ExchangeConfig::from_file(path)?
        }
        None => ExchangeConfig::gbce(),
    };

    let exchange = Exchange::from_config(&config)?;
    println!("Created exchange {}", exchange);
    for stock in exchange.stocks() {
        println!("Added {} to {}", stock, exchange);
    }

    let mut feed = match options.seed {
        Some(seed) => TradeFeedSimulator::with_seed(TradeFeedConfig::default(), seed)?,
        None => TradeFeedSimulator::new(TradeFeedConfig::default())?,
    };

    println!("Recording {} random trades:", options.trades);
    for _ in 0..options.trades {
        let trade = feed.tick(&exchange)?;
        println!("   {}", trade);
    }

    let report = MarketReport::capture(&exchange)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
