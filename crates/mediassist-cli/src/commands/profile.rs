//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the profile command.
pub fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, name, formatter),
        ProfileAction::Set {
            name,
            provider,
            model,
            base_url,
            api_key_env,
            timeout_secs,
        } => {
            let profile = Profile {
                provider: provider.into(),
                model,
                base_url,
                api_key_env,
                timeout_secs,
            };
            set_profile(config, name, profile, formatter)
        }
        ProfileAction::Delete { name } => delete_profile(config, name, formatter),
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    let mut names: Vec<&String> = config.profiles.keys().collect();
    names.sort();

    println!("Available profiles:");
    for name in names {
        let profile = &config.profiles[name];
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile_details(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile_details(profile, "  ");

    if let Err(e) = profile.api_key() {
        println!("{}", formatter.warning(&e.to_string()));
    }

    Ok(())
}

fn print_profile_details(profile: &Profile, indent: &str) {
    println!("{}Provider: {}", indent, profile.provider.as_str());
    println!("{}Model: {}", indent, profile.model);
    if let Some(url) = &profile.base_url {
        println!("{}URL: {}", indent, url);
    }
    if let Some(var) = profile.api_key_var() {
        println!("{}API key env: {}", indent, var);
    }
    println!("{}Timeout: {}s", indent, profile.timeout_secs);
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save()?;
    println!("{}", formatter.success(&format!("Switched to profile '{}'", name)));
    Ok(())
}

/// Create or update a profile.
fn set_profile(
    config: &mut Config,
    name: String,
    profile: Profile,
    formatter: &Formatter,
) -> Result<()> {
    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), profile);
    config.save()?;

    println!("{}", formatter.success(&format!("{} profile '{}'", action, name)));

    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted("Cannot delete the active profile".to_string()));
    }

    if config.profiles.remove(&name).is_some() {
        config.save()?;
        println!("{}", formatter.success(&format!("Deleted profile '{}'", name)));
    } else {
        println!("{}", formatter.warning(&format!("Profile '{}' does not exist", name)));
    }

    Ok(())
}
