use blackjack_ev::calculation::{build_approximate_dealer_table, calculate_closed_form_expectation};
use blackjack_ev_drivers::paper::{compare_with_paper, print_paper_comparison};
use blackjack_ev_drivers::{
    exit_on_error, init_logger, print_completion_tables, print_dealer_distributions,
    print_expected_winnings, print_hole_card_odds, print_strategy, CommonArgs, DriverError,
};
use clap::Parser;
use log::info;

/// Closed-form expectation on the two-stage approximate dealer table, as
/// worked out in the 1956 paper.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Print the error against the published tables
    #[arg(short, long)]
    error: bool,
}

fn run(args: &CommandLineArgs) -> Result<(), DriverError> {
    let strategy = args.common.strategy()?;
    let settings = args.common.settings()?;
    info!("{:<32}{}", "number of threads", settings.number_of_threads);

    let dealer_table = build_approximate_dealer_table(&settings.deck);
    let details = calculate_closed_form_expectation(&settings, &strategy, &dealer_table);

    print_strategy(strategy);
    if args.common.verbose {
        print_dealer_distributions(&dealer_table, false);
        print_dealer_distributions(&dealer_table, true);
        print_completion_tables(&details);
        print_hole_card_odds(&details);
    }
    print_expected_winnings(&details.expected_winnings);

    if args.error {
        if let Some(comparison) = compare_with_paper(&dealer_table, &details.expected_winnings) {
            print_paper_comparison(&comparison);
        }
    }
    Ok(())
}

fn main() {
    let args = CommandLineArgs::parse();
    init_logger(args.common.verbose);
    exit_on_error(run(&args));
}
