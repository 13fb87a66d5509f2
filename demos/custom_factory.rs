//! Extending the format with a new value syntax.
//!
//! Registers a factory for `$` that reads `$1h30m`-style durations into a
//! numeric number of seconds, and logs parser activity at debug level.
//!
//! Run with: cargo run --example custom_factory

use sigil_format::{Error, Parser, Position, Result, Value, ValueFactory};
use tracing::Level;

struct DurationFactory;

impl ValueFactory for DurationFactory {
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        let reader = parser.reader();
        let mut seconds: i64 = 0;
        loop {
            let digits = reader.read_while(|c| c.is_ascii_digit())?;
            if digits.is_empty() {
                break;
            }
            let amount: i64 = digits
                .parse()
                .map_err(|_| Error::malformed(start, reader.position(), "duration too large"))?;
            let unit = match reader.read()? {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                other => {
                    return Err(Error::malformed(
                        start,
                        reader.position(),
                        format!("unknown duration unit {:?}", other),
                    ))
                }
            };
            seconds += amount * unit;
        }
        Ok(Value::from(seconds))
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let mut parser = Parser::from_str("{Job timeout $1h30m retry $45s} [ $2m $10s ]");
    parser.register_factory('$', DurationFactory);

    for value in &mut parser {
        println!("{}", value?);
    }

    let mut broken = Parser::from_str("[ $5d ]");
    broken.register_factory('$', DurationFactory);
    if let Err(err) = broken.parse_next() {
        println!("\nRejected: {}", err);
    }

    Ok(())
}
