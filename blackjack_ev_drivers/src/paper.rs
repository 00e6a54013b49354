//! Tables published by Baldwin, Cantey, Maisel and McDermott (1956), "The
//! Optimum Strategy in Blackjack", and the error of a calculation against
//! them.

use blackjack_ev::calculation::{DealerTable, DealerTotalDistribution, ExpectedWinnings};

use crate::card_label;

/// Dealer totals 17 to 21, then natural (22) and bust (0).
pub const PAPER_COLUMNS: [usize; 7] = [17, 18, 19, 20, 21, 22, 0];

pub const PAPER_UP_CARDS: [u8; 10] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 1];

pub const PAPER_DEALER_TOTALS: [[f64; 7]; 10] = [
    [0.141781, 0.134885, 0.131432, 0.123829, 0.119581, 0.0, 0.348492],
    [0.133533, 0.133052, 0.126197, 0.122563, 0.114903, 0.0, 0.369751],
    [0.132206, 0.116037, 0.122553, 0.117930, 0.114292, 0.0, 0.396983],
    [0.121374, 0.124511, 0.117753, 0.105446, 0.107823, 0.0, 0.423092],
    [0.167625, 0.107233, 0.108018, 0.101260, 0.098364, 0.0, 0.417499],
    [0.372743, 0.139017, 0.077841, 0.079409, 0.073437, 0.0, 0.257552],
    [0.131202, 0.363359, 0.129634, 0.068457, 0.070026, 0.0, 0.237322],
    [0.122256, 0.104217, 0.357550, 0.122256, 0.061079, 0.0, 0.232643],
    [0.114756, 0.113186, 0.114756, 0.328873, 0.036324, 0.078431, 0.213674],
    [0.128147, 0.131284, 0.129716, 0.131284, 0.051284, 0.313725, 0.114560],
];

pub const PAPER_NO_NATURAL_UP_CARDS: [u8; 2] = [10, 1];

pub const PAPER_NO_NATURAL_TOTALS: [[f64; 7]; 2] = [
    [0.124522, 0.122819, 0.124522, 0.356862, 0.039415, 0.0, 0.231859],
    [0.186728, 0.191299, 0.189015, 0.191299, 0.074728, 0.0, 0.166930],
];

pub const PAPER_EXPECTED_WINNINGS: [f64; 10] = [
    0.090, 0.123, 0.167, 0.218, 0.230, 0.148, 0.056, -0.043, -0.176, -0.363,
];

pub const PAPER_OVERALL: f64 = -0.006;

/// Rows of computed values laid out like the published table they are
/// compared with.
#[derive(Debug, Clone, PartialEq)]
pub struct TableComparison<const C: usize> {
    pub up_cards: Vec<u8>,
    pub computed: Vec<[f64; C]>,
    pub paper: Vec<[f64; C]>,
    pub error: Vec<[f64; C]>,
}

impl<const C: usize> TableComparison<C> {
    /// The computed values are rounded to the precision the paper prints
    /// before they are compared.
    fn new(up_cards: &[u8], computed: Vec<[f64; C]>, paper: &[[f64; C]], digits: i32) -> Self {
        let error = computed
            .iter()
            .zip(paper.iter())
            .map(|(computed_row, paper_row)| {
                let mut error_row = [0.0; C];
                for (i, error) in error_row.iter_mut().enumerate() {
                    *error = round_to(computed_row[i], digits) - paper_row[i];
                }
                error_row
            })
            .collect();
        TableComparison {
            up_cards: up_cards.to_vec(),
            computed,
            paper: paper.to_vec(),
            error,
        }
    }

    pub fn sum_of_squared_errors(&self) -> f64 {
        self.error
            .iter()
            .flat_map(|row| row.iter())
            .map(|error| error * error)
            .sum()
    }

    pub fn max_abs_error(&self) -> f64 {
        self.error
            .iter()
            .flat_map(|row| row.iter())
            .fold(0.0, |max, error| f64::max(max, error.abs()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaperComparison {
    pub dealer_totals: TableComparison<7>,
    pub no_natural_totals: TableComparison<7>,
    pub expected_winnings: TableComparison<10>,
    pub overall: f64,
    pub overall_error: f64,
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

fn paper_row(distribution: &DealerTotalDistribution) -> [f64; 7] {
    PAPER_COLUMNS.map(|column| distribution[column])
}

/// Compares a dealer table and the expectations calculated from it with
/// the published tables. Returns `None` unless all ten up cards were
/// calculated.
pub fn compare_with_paper(
    dealer_table: &DealerTable,
    expected_winnings: &ExpectedWinnings,
) -> Option<PaperComparison> {
    let overall = expected_winnings.overall()?;
    let mut computed_winnings = [0.0; 10];
    for (i, &dealer_up_card) in PAPER_UP_CARDS.iter().enumerate() {
        computed_winnings[i] = expected_winnings.get(dealer_up_card)?;
    }

    let dealer_totals = TableComparison::new(
        &PAPER_UP_CARDS,
        PAPER_UP_CARDS
            .iter()
            .map(|&dealer_up_card| paper_row(dealer_table.get(dealer_up_card)))
            .collect(),
        &PAPER_DEALER_TOTALS,
        6,
    );
    let no_natural_totals = TableComparison::new(
        &PAPER_NO_NATURAL_UP_CARDS,
        PAPER_NO_NATURAL_UP_CARDS
            .iter()
            .map(|&dealer_up_card| paper_row(&dealer_table.without_natural(dealer_up_card)))
            .collect(),
        &PAPER_NO_NATURAL_TOTALS,
        6,
    );
    let expected_winnings = TableComparison::new(
        &[0],
        vec![computed_winnings],
        &[PAPER_EXPECTED_WINNINGS],
        3,
    );

    Some(PaperComparison {
        dealer_totals,
        no_natural_totals,
        expected_winnings,
        overall,
        overall_error: overall - PAPER_OVERALL,
    })
}

fn print_dealer_markdown(title: &str, up_cards: &[u8], rows: &[[f64; 7]]) {
    println!();
    println!("{}", title);
    println!("Dealer Face Up Card / Dealer Total");
    println!("| |17|18|19|20|21|Natural|Bust|");
    println!("|--|--|--|--|--|--|--|--|");
    for (dealer_up_card, row) in up_cards.iter().zip(rows.iter()) {
        let mut line = format!("|{}|", card_label(*dealer_up_card));
        for p in row {
            line += &format!("{:.6}|", p);
        }
        println!("{}", line);
    }
}

fn print_winnings_markdown(title: &str, row: &[f64; 10], overall: f64) {
    println!();
    println!("{}", title);
    println!("Dealer Face Up Card");
    let mut header = String::from("|");
    let mut separator = String::from("|");
    let mut line = String::from("|");
    for (dealer_up_card, ex) in PAPER_UP_CARDS.iter().zip(row.iter()) {
        header += &format!("{}|", card_label(*dealer_up_card));
        separator += "--|";
        line += &format!("{:.3}|", ex);
    }
    println!("{}", header);
    println!("{}", separator);
    println!("{}", line);
    println!("Overall {:.3}", overall);
}

fn print_errors(title: &str, comparison: &TableComparison<7>) {
    println!();
    println!("{}", title);
    for (dealer_up_card, row) in comparison.up_cards.iter().zip(comparison.error.iter()) {
        let mut line = format!("{:<4}", card_label(*dealer_up_card));
        for error in row {
            line += &format!("{:>11.6}", error);
        }
        println!("{}", line);
    }
    println!(
        "{:<32}{:e}",
        "sum of squared errors",
        comparison.sum_of_squared_errors()
    );
}

pub fn print_paper_comparison(comparison: &PaperComparison) {
    print_errors("dealer total probabilities error", &comparison.dealer_totals);
    print_errors(
        "dealer total probabilities given no natural error",
        &comparison.no_natural_totals,
    );

    println!();
    println!("expected winnings error");
    for (dealer_up_card, error) in PAPER_UP_CARDS
        .iter()
        .zip(comparison.expected_winnings.error[0].iter())
    {
        println!("{:<4}{:>8.3}", card_label(*dealer_up_card), error);
    }
    println!("{:<32}{:.6}", "overall expected winnings error", comparison.overall_error);

    let dealer_totals = &comparison.dealer_totals;
    print_dealer_markdown(
        "Dealer Total Probabilities (calculated)",
        &dealer_totals.up_cards,
        &dealer_totals.computed,
    );
    print_dealer_markdown(
        "Dealer Total Probabilities (paper)",
        &dealer_totals.up_cards,
        &dealer_totals.paper,
    );
    print_dealer_markdown(
        "Dealer Total Probabilities (error)",
        &dealer_totals.up_cards,
        &dealer_totals.error,
    );

    let no_natural_totals = &comparison.no_natural_totals;
    print_dealer_markdown(
        "Dealer Total Probabilities NO NATURAL (calculated)",
        &no_natural_totals.up_cards,
        &no_natural_totals.computed,
    );
    print_dealer_markdown(
        "Dealer Total Probabilities NO NATURAL (paper)",
        &no_natural_totals.up_cards,
        &no_natural_totals.paper,
    );
    print_dealer_markdown(
        "Dealer Total Probabilities NO NATURAL (error)",
        &no_natural_totals.up_cards,
        &no_natural_totals.error,
    );

    let expected_winnings = &comparison.expected_winnings;
    print_winnings_markdown(
        "Expected Winnings (calculated)",
        &expected_winnings.computed[0],
        comparison.overall,
    );
    print_winnings_markdown(
        "Expected Winnings (paper)",
        &expected_winnings.paper[0],
        PAPER_OVERALL,
    );
    print_winnings_markdown(
        "Expected Winnings (error)",
        &expected_winnings.error[0],
        comparison.overall_error,
    );
}
