pub mod paper;

use std::fs;
use std::path::{Path, PathBuf};

use blackjack_ev::calculation::{ClosedFormDetails, DealerTable, ExpectedWinnings};
use blackjack_ev::{
    CalculationSettings, ConfigError, Deck, StrategyPreset, CARD_VALUES, STANDARD_DECK_COUNTS,
};
use clap::Args;
use log::{error, LevelFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Cannot find home directory")]
    NoHomeDirectory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calculation: ConfigCalculation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCalculation {
    #[serde(default = "standard_deck_counts")]
    pub deck_counts: [u16; 10],
    #[serde(default)]
    pub number_of_threads: usize,
}

fn standard_deck_counts() -> [u16; 10] {
    STANDARD_DECK_COUNTS
}

impl Default for ConfigCalculation {
    fn default() -> Self {
        Self {
            deck_counts: STANDARD_DECK_COUNTS,
            number_of_threads: 0,
        }
    }
}

impl TryInto<CalculationSettings> for ConfigCalculation {
    type Error = ConfigError;

    fn try_into(self) -> Result<CalculationSettings, Self::Error> {
        let deck = Deck::new(self.deck_counts)?;
        Ok(CalculationSettings::new(deck, self.number_of_threads))
    }
}

/// Arguments shared by every calculator.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Strategy preset: baldwin-optimum, culbertson or mimicdealer
    #[arg(default_value_t = String::from("baldwin-optimum"))]
    pub strategy: String,

    /// Print intermediate tables as well as the results
    #[arg(short, long)]
    pub verbose: bool,

    /// The path of an optional config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of threads, 0 for one per core
    #[arg(short, long)]
    pub threads: Option<usize>,
}

impl CommonArgs {
    pub fn strategy(&self) -> Result<StrategyPreset, DriverError> {
        Ok(StrategyPreset::from_name(&self.strategy)?)
    }

    /// Settings from the config file when one is given, with the thread
    /// count from the command line taking precedence.
    pub fn settings(&self) -> Result<CalculationSettings, DriverError> {
        let mut config_calculation = match &self.config {
            Some(path) => parse_config_from_file(&expand_config_path(path)?)?.calculation,
            None => ConfigCalculation::default(),
        };
        if let Some(number_of_threads) = self.threads {
            config_calculation.number_of_threads = number_of_threads;
        }
        Ok(config_calculation.try_into()?)
    }
}

/// Expands a leading `~/` to the home directory.
pub fn expand_config_path(path: &str) -> Result<PathBuf, DriverError> {
    match path.strip_prefix("~/") {
        Some(relative) => {
            let home_dir = home::home_dir().ok_or(DriverError::NoHomeDirectory)?;
            Ok(home_dir.join(relative))
        }
        None => Ok(PathBuf::from(path)),
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &Path) -> Result<Config, DriverError> {
    let file_content = fs::read_to_string(filename).map_err(|source| DriverError::Io {
        path: filename.to_path_buf(),
        source,
    })?;
    parse_config(&file_content)
}

pub fn parse_config(content: &str) -> Result<Config, DriverError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Logs to stderr so that stdout only carries results.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    if let Err(err) = simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Cannot initialize logger: {}", err);
    }
}

/// Reports the error and exits with status 1.
pub fn exit_on_error<T>(result: Result<T, DriverError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            if log::log_enabled!(log::Level::Error) {
                error!("{}", err);
            } else {
                eprintln!("error: {}", err);
            }
            std::process::exit(1)
        }
    }
}

pub fn card_label(card_value: u8) -> String {
    if card_value == 1 {
        String::from("A")
    } else {
        card_value.to_string()
    }
}

pub fn print_strategy(strategy: StrategyPreset) {
    println!("{:<32}{}", "strategy", strategy);
}

/// One row per up card: bust, 17 to 21, natural and the sum.
pub fn print_dealer_distributions(dealer_table: &DealerTable, without_natural: bool) {
    println!();
    if without_natural {
        println!(
            "dealer total probabilities given no natural ({})",
            dealer_table.method()
        );
    } else {
        println!("dealer total probabilities ({})", dealer_table.method());
    }
    println!(
        "{:<4}{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}{:>14}",
        "up", "bust", "17", "18", "19", "20", "21", "natural", "sum"
    );
    for dealer_up_card in CARD_VALUES {
        let distribution = if without_natural {
            dealer_table.without_natural(dealer_up_card)
        } else {
            *dealer_table.get(dealer_up_card)
        };
        let mut line = format!("{:<4}{:>10.6}", card_label(dealer_up_card), distribution.p_bust());
        for total in 17..=21 {
            line += &format!("{:>10.6}", distribution[total]);
        }
        line += &format!("{:>10.6}{:>14.12}", distribution.p_natural(), distribution.sum());
        println!("{}", line);
    }
}

pub fn print_unique_dealer_hands(dealer_table: &DealerTable) {
    println!();
    println!("unique dealer hands ({})", dealer_table.method());
    for dealer_up_card in CARD_VALUES {
        let count = dealer_table
            .unique_dealer_hands(dealer_up_card)
            .map_or(String::from("-"), |count| count.to_string());
        println!(
            "{:<4}{:>8}{:>18.12}",
            card_label(dealer_up_card),
            count,
            dealer_table.get(dealer_up_card).sum()
        );
    }
}

pub fn print_player_outcomes(rows: &[(u8, usize, f64)]) {
    println!();
    println!("unique player hands");
    for &(dealer_up_card, count, probability) in rows {
        println!("{:<4}{:>8}{:>18.12}", card_label(dealer_up_card), count, probability);
    }
}

/// Completion rows only list bust and 12 to 21, the totals a player can
/// end on.
pub fn print_completion_tables(details: &ClosedFormDetails) {
    println!();
    println!("player completion probabilities");
    let mut header = format!("{:<4}{:<6}{:>4}{:>9}", "up", "hand", "", "bust");
    for total in 12..=21 {
        header += &format!("{:>9}", total);
    }
    header += &format!("{:>10}", "sum");
    println!("{}", header);
    for dealer_up_card in CARD_VALUES {
        let table = details.completion_tables.get(dealer_up_card);
        for (start, soft, row) in table.rows() {
            let mut line = format!(
                "{:<4}{:<6}{:>4}{:>9.6}",
                card_label(dealer_up_card),
                if soft { "soft" } else { "hard" },
                start,
                row[0]
            );
            for p in &row[12..=21] {
                line += &format!("{:>9.6}", p);
            }
            line += &format!("{:>10.6}", row.iter().sum::<f64>());
            println!("{}", line);
        }
    }
}

pub fn print_hole_card_odds(details: &ClosedFormDetails) {
    println!();
    println!("player hole card probabilities");
    println!(
        "{:<4}{:>10}{:>10}{:>10}{:>10}{:>14}",
        "up", "hard", "soft", "natural", "pairs", "sum"
    );
    for (dealer_up_card, odds) in CARD_VALUES.iter().zip(details.hole_card_odds.iter()) {
        println!(
            "{:<4}{:>10.6}{:>10.6}{:>10.6}{:>10.6}{:>14.12}",
            card_label(*dealer_up_card),
            odds.p_hard_totals(),
            odds.p_soft_totals(),
            odds.p_natural,
            odds.p_all_pairs(),
            odds.sum()
        );
    }
}

pub fn print_expected_winnings(expected_winnings: &ExpectedWinnings) {
    println!();
    println!("expected winnings by dealer up card");
    for (dealer_up_card, ex) in expected_winnings.iter() {
        println!("{:<4}{:>14.9}", card_label(dealer_up_card), ex);
    }
    if let Some(overall) = expected_winnings.overall() {
        println!("{:<32}{:.9}", "overall expected winnings", overall);
    }
}
