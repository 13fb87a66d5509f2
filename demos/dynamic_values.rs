//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use sigil_format::{compose, from_value, to_value, value, Data};
use std::error::Error;
use std::rc::Rc;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Rc::new(value!({Config
        host: "localhost",
        port: 8080,
        features: ["auth", "logging", "metrics"],
        debug: 1,
    }));

    println!("Config:\n{}\n", compose(&config)?);

    println!("Accessing field 'host': {}", config.get("host").map_or(Ok(""), |v| v.as_str())?);
    if let Some(port) = config.get("port") {
        println!("Accessing field 'port': {}", port.as_i64()?);
    }
    if let Some(features) = config.get("features") {
        println!("Accessing field 'features': {} items\n", features.as_array()?.len());
    }

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    let user_value = Rc::new(to_value(&user)?);
    println!("User as Value:\n{}\n", compose(&user_value)?);

    if let Data::Composite(composite) = user_value.data() {
        for (name, member) in composite.members() {
            println!("  {} is tagged {}", name, member.tag());
        }
    }

    let user_back: User = from_value(&user_value)?;
    println!("\nBack to struct: {:?}", user_back);

    Ok(())
}
