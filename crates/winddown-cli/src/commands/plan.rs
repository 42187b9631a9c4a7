use chrono::Local;
use winddown_core::{compute_plan, Config};

use crate::display;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let input = config.plan_input()?;
    let now = Local::now();
    let plan = compute_plan(&input, now)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("{}", display::render_plan(&plan, now));
    }
    Ok(())
}
