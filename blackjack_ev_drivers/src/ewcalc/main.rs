use blackjack_ev::calculation::{
    build_exact_dealer_table, calculate_enumeration_expectation, summarize_player_outcomes,
};
use blackjack_ev::CARD_VALUES;
use blackjack_ev_drivers::{
    exit_on_error, init_logger, print_dealer_distributions, print_expected_winnings,
    print_player_outcomes, print_strategy, print_unique_dealer_hands, CommonArgs, DriverError,
};
use clap::Parser;
use log::info;

/// Exact enumeration of every player hand against the exact dealer table.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    #[command(flatten)]
    common: CommonArgs,
}

fn run(args: &CommandLineArgs) -> Result<(), DriverError> {
    let strategy = args.common.strategy()?;
    let settings = args.common.settings()?;
    info!("{:<32}{}", "number of threads", settings.number_of_threads);

    let dealer_table = build_exact_dealer_table(&settings);
    let expected_winnings = calculate_enumeration_expectation(&settings, &strategy, &dealer_table);

    print_strategy(strategy);
    if args.common.verbose {
        print_unique_dealer_hands(&dealer_table);
        print_dealer_distributions(&dealer_table, false);
        print_dealer_distributions(&dealer_table, true);
        let player_outcomes: Vec<(u8, usize, f64)> = CARD_VALUES
            .iter()
            .map(|&dealer_up_card| {
                let (count, probability) =
                    summarize_player_outcomes(&settings.deck, &strategy, dealer_up_card);
                (dealer_up_card, count, probability)
            })
            .collect();
        print_player_outcomes(&player_outcomes);
    }
    print_expected_winnings(&expected_winnings);
    Ok(())
}

fn main() {
    let args = CommandLineArgs::parse();
    init_logger(args.common.verbose);
    exit_on_error(run(&args));
}
