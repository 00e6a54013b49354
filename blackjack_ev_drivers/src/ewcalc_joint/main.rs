use blackjack_ev::calculation::calculate_joint_expectation;
use blackjack_ev::{check_dealer_up_card, CARD_VALUES};
use blackjack_ev_drivers::{
    card_label, exit_on_error, init_logger, print_expected_winnings, print_strategy, CommonArgs,
    DriverError,
};
use clap::Parser;
use log::info;

/// Joint enumeration of the dealer's and the player's hands, so that the
/// dealer's odds account for the player's cards.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Only calculate this dealer up card (1 for an ace)
    #[arg(short, long)]
    dfu: Option<u8>,
}

fn run(args: &CommandLineArgs) -> Result<(), DriverError> {
    let strategy = args.common.strategy()?;
    let dealer_up_cards = match args.dfu {
        Some(dealer_up_card) => vec![check_dealer_up_card(dealer_up_card)?],
        None => CARD_VALUES.to_vec(),
    };
    let settings = args.common.settings()?;
    info!("{:<32}{}", "number of threads", settings.number_of_threads);

    let joint = calculate_joint_expectation(&settings, &strategy, &dealer_up_cards);

    print_strategy(strategy);
    if args.common.verbose {
        println!();
        println!("probability mass");
        for &dealer_up_card in &dealer_up_cards {
            if let Some(mass) = joint.probability_mass[(dealer_up_card - 1) as usize] {
                println!("{:<4}{:>18.12}", card_label(dealer_up_card), mass);
            }
        }
    }
    print_expected_winnings(&joint.expected_winnings);
    Ok(())
}

fn main() {
    let args = CommandLineArgs::parse();
    init_logger(args.common.verbose);
    exit_on_error(run(&args));
}
