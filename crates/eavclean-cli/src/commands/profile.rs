//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the profile command.
pub fn execute_profile(args: ProfileArgs, config: &mut Config, path: &Path, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, path, name, formatter),
        ProfileAction::Set {
            name,
            database,
            table_prefix,
            edition,
            media_root,
            system_defaults,
        } => {
            let profile = Profile {
                database,
                table_prefix: table_prefix.unwrap_or_default(),
                edition: edition.into(),
                media_root,
                system_defaults,
            };
            set_profile(config, path, name, profile, formatter)
        }
        ProfileAction::Delete { name } => delete_profile(config, path, name, formatter),
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");

    Ok(())
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}Database: {}", indent, profile.database);
    if !profile.table_prefix.is_empty() {
        println!("{}Table prefix: {}", indent, profile.table_prefix);
    }
    println!("{}Edition: {:?}", indent, profile.edition);
    if let Some(root) = &profile.media_root {
        println!("{}Media root: {}", indent, root);
    }
    if let Some(defaults) = &profile.system_defaults {
        println!("{}System defaults: {}", indent, defaults);
    }
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, path: &Path, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save(path)?;
    println!("{}", formatter.success(&format!("Switched to profile '{}'", name)));
    Ok(())
}

/// Create or update a profile.
fn set_profile(config: &mut Config, path: &Path, name: String, profile: Profile, formatter: &Formatter) -> Result<()> {
    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), profile);
    config.save(path)?;

    println!("{}", formatter.success(&format!("{} profile '{}'", action, name)));

    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, path: &Path, name: String, formatter: &Formatter) -> Result<()> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted("Cannot delete the active profile".to_string()));
    }

    if config.profiles.remove(&name).is_some() {
        config.save(path)?;
        println!("{}", formatter.success(&format!("Deleted profile '{}'", name)));
    } else {
        println!("{}", formatter.warning(&format!("Profile '{}' does not exist", name)));
    }

    Ok(())
}
