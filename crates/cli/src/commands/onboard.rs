//! `smalltalk onboard` - First-time setup.

use std::path::Path;

use smalltalk_config::AppConfig;

/// Written into a fresh profiles directory so `source = "static"` works
/// out of the box.
const SAMPLE_PROFILE: &str = "\
name Maria Jensen
sex female
job marine biologist
company Blue Harbor Ltd
residence 17 Harbor Road, Lisbon
birthdate 1987-04-12
blood_group O+
favourite sailing
";

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();
    let profiles_dir = AppConfig::default().profiles.dir;

    println!("SmallTalk — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if write_sample_profiles(&profiles_dir)? {
        println!("Created sample profile in: {}", profiles_dir.display());
    }

    if config_path.exists() {
        println!("\nConfig already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("Created config.toml at: {}", config_path.display());
        println!("\nNext steps:");
        for (i, step) in next_steps(&profiles_dir).iter().enumerate() {
            println!("   {}. {step}", i + 1);
        }
        println!();
    }

    println!("Setup complete! Run `smalltalk chat` to start talking.\n");

    Ok(())
}

fn next_steps(profiles_dir: &Path) -> Vec<String> {
    vec![
        "Set [reply] backend = \"openai_compat\" and an api_key for real replies".into(),
        format!(
            "Set [profiles] source = \"static\" to use {}",
            profiles_dir.display()
        ),
        // Safari and some others drop Secure cookies on plain http, which
        // would mint a new user id on every request.
        "Serving over plain http? Set [gateway] secure_cookie = false or the \
         browser may drop the user id cookie"
            .into(),
        "Run: smalltalk chat   or   smalltalk serve".into(),
    ]
}

/// Create `dir` with one sample profile unless it already exists. Returns
/// whether anything was written.
fn write_sample_profiles(dir: &Path) -> std::io::Result<bool> {
    if dir.exists() {
        return Ok(false);
    }
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join("maria.txt"), SAMPLE_PROFILE)?;
    Ok(true)
}
