use pedido::{Quote, Reason, Reply, RunResult};
use std::io::{self, Write};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, result: &RunResult, quote: &Quote, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Matching: \"{}\"", input), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Validation ━━━", ansi::GRAY));
    print_validation(result, &palette);

    println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
    if result.candidates.is_empty() {
        println!("{}", palette.dim("  No items found"));
    } else {
        print_candidates(input, result, &palette);
    }

    println!("\n{}", palette.paint("━━━ Quote ━━━", ansi::GRAY));
    print_quote(quote, &palette);

    let m = &result.metrics;
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Scan: {}  │  Score: {}  │  Extract: {}  │  Needles: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.paint(format!("{:?}", m.scan), ansi::CYAN),
        palette.dim(format!("{:?}", m.score)),
        palette.dim(format!("{:?}", m.extract)),
        palette.dim(m.needles.to_string()),
    );
    println!();
}

fn print_validation(result: &RunResult, palette: &ansi::Palette) {
    let v = &result.validation;
    let verdict = if v.is_order { palette.paint("✓ order", ansi::GREEN) } else { palette.paint("✗ not an order", ansi::YELLOW) };
    println!("  {} {}", verdict, palette.dim(format!("({})", v.reason)));

    if let Reason::Recognized(items) = &v.reason {
        for item in items.iter().take(5) {
            println!(
                "    {} {} {}",
                palette.paint(format!("{:>3}", item.score), ansi::YELLOW),
                palette.paint(&item.name, ansi::BLUE),
                palette.dim(item.strength.as_str())
            );
        }
        if items.len() > 5 {
            println!("    {}", palette.dim(format!("... +{} more", items.len() - 5)));
        }
    }
}

fn print_candidates(input: &str, result: &RunResult, palette: &ansi::Palette) {
    for (idx, c) in result.candidates.iter().enumerate() {
        let span = c.source_span;
        println!(
            "  {} {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.paint(format!("{}×", c.quantity), ansi::YELLOW),
            palette.bold(palette.paint(&c.base_item_name, ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("span {}..{} {:?}", span.start, span.end, input.get(span.start..span.end).unwrap_or("")), ansi::YELLOW),
        );
        let variation = match &c.matched_variation {
            Some(label) => palette.paint(label, ansi::CYAN),
            None => palette.paint("needs choice", ansi::YELLOW),
        };
        println!(
            "      {} {}  {} {}  {} {}",
            palette.dim("variation:"),
            variation,
            palette.dim("│ unit:"),
            palette.paint(format!("₱{}", c.unit_price), ansi::BLUE),
            palette.dim("│ match:"),
            palette.dim(c.strength.as_str())
        );
    }
}

fn print_quote(quote: &Quote, palette: &ansi::Palette) {
    if !quote.is_priced() {
        println!("{}", palette.dim("  Unpriced"));
        return;
    }
    for line in &quote.breakdown {
        println!(
            "  {} {} {}",
            palette.paint(format!("{}×", line.quantity), ansi::YELLOW),
            line.name,
            palette.dim(format!("₱{} = ₱{}", line.unit_price, line.line_total))
        );
    }
    println!("  {} {}", palette.bold("Total:"), palette.bold(palette.paint(format!("₱{}", quote.total), ansi::GREEN)));
}

/// Render a bot reply for the chat REPL; options show the token to type.
pub fn write_reply(out: &mut impl Write, reply: &Reply, color: bool) -> io::Result<()> {
    let palette = ansi::Palette::new(color);
    writeln!(out, "\n{}", reply.text())?;
    for option in reply.options() {
        writeln!(out, "  {} {}", palette.paint(format!("/{}", option.token), ansi::CYAN), palette.dim(&option.label))?;
    }
    writeln!(out)
}
