//! Account CLI commands: register, login, logout, whoami

use clap::Subcommand;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::error::{MedexpError, MedexpResult};
use crate::services::AuthService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create an account and sign in
    Register {
        /// Display name used on reports
        name: String,
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = "MEDEXP_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in to an existing account
    Login {
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = "MEDEXP_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out on this machine
    Logout,
    /// Show the signed-in user
    Whoami,
}

pub fn handle_user_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: UserCommands,
) -> MedexpResult<()> {
    let auth = AuthService::new(&storage.users);

    match cmd {
        UserCommands::Register {
            name,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => Zeroizing::new(p),
                None => prompt_new_password()?,
            };
            let profile = auth.register(&name, &email, &password)?;

            settings.active_user = Some(profile.id);
            settings.save(storage.paths())?;
            println!("Registered and signed in as {} <{}>", profile.name, profile.email);
        }

        UserCommands::Login { email, password } => {
            let password = match password {
                Some(p) => Zeroizing::new(p),
                None => prompt_password("Password: ")?,
            };
            let profile = auth.login(&email, &password)?;

            settings.active_user = Some(profile.id);
            settings.save(storage.paths())?;
            println!("Signed in as {} <{}>", profile.name, profile.email);
        }

        UserCommands::Logout => {
            if settings.active_user.take().is_some() {
                settings.save(storage.paths())?;
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
        }

        UserCommands::Whoami => match settings.active_user {
            Some(id) => {
                let profile = auth.profile(id)?;
                println!("{} <{}>", profile.name, profile.email);
                println!("Member since {}", profile.created_at.format("%Y-%m-%d"));
            }
            None => println!("Not signed in."),
        },
    }

    Ok(())
}

fn prompt_new_password() -> MedexpResult<Zeroizing<String>> {
    let first = prompt_password("Choose a password: ")?;
    let second = prompt_password("Confirm password: ")?;
    if *first != *second {
        return Err(MedexpError::Validation("Passwords do not match".into()));
    }
    Ok(first)
}

fn prompt_password(prompt: &str) -> MedexpResult<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| MedexpError::Auth(format!("Failed to read password: {}", e)))
}
