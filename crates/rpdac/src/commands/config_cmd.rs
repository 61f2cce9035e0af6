//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const MASK: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::active_config_path(global);
            let mut cfg = config::load(global)?;
            eprintln!("rpdac configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let endpoint: String = Input::new()
                .with_prompt("ReportPortal URL")
                .default("https://reportportal.example.com".into())
                .interact_text()
                .map_err(prompt_err)?;
            rpdac_config::validate_endpoint(&endpoint)?;

            let project: String = Input::new()
                .with_prompt("Project")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let token = rpassword::prompt_password("Access token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "access token cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the access token?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let token = if store_selection == 0 {
                rpdac_config::store_token(&profile_name, &SecretString::from(token))?;
                eprintln!("   Access token stored in system keyring");
                None
            } else {
                Some(token)
            };

            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    endpoint,
                    project: Some(project).filter(|p| !p.is_empty()),
                    token,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            config::save_config_to(&cfg, &config_path)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Try it: rpdac get filter <name>");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load(global)?;
            for profile in cfg.profiles.values_mut() {
                if profile.token.is_some() {
                    profile.token = Some(MASK.into());
                }
            }

            let out = output::render_single(
                global.output,
                &cfg,
                output::render_yaml,
                |c| c.profile_name(global.profile.as_deref()).to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            let active = cfg.profile_name(global.profile.as_deref());
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: rpdac config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == active { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;

            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(&name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            config::save_config_to(&cfg, &config::active_config_path(global))?;
            eprintln!("Default profile set to '{name}'");
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load(global)?;
            let profile_name =
                profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(config::profile_not_found(&profile_name, &cfg));
            }

            let token = rpassword::prompt_password("Access token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "access token cannot be empty".into(),
                });
            }

            rpdac_config::store_token(&profile_name, &SecretString::from(token))?;
            eprintln!("Access token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
