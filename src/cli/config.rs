use crate::error::Result;
use crate::settings::{load_settings_from, save_settings_to, settings_path, Settings};

pub fn run(init: bool) -> Result<()> {
    let path = settings_path();

    if init {
        if path.exists() {
            println!("Settings already exist at {}", path.display());
        } else {
            save_settings_to(&Settings::default(), &path)?;
            println!("Wrote {}", path.display());
        }
    }

    let settings = load_settings_from(&path)?;
    let source = if path.exists() { "" } else { " (defaults, file not found)" };
    println!("Settings:         {}{source}", path.display());
    println!("Category column:  {}", settings.category_column);
    println!("Amount column:    {}", settings.amount_column);
    println!("Number format:    {}", settings.number_format);
    println!("Currency:         {}", settings.currency);
    Ok(())
}
