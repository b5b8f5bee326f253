//! The interactive menus. Each screen reads from the console, hands a
//! request to profnet-core and prints the outcome. Backend failures are
//! reported and the session carries on; only I/O errors on the console
//! itself end it.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::warn;

use profnet_core::account::{self, check_handle};
use profnet_core::{
    AccountError, Admission, RecordStore, Refusal, Route, Snapshot, Triage, TriageStep,
    evaluate_request,
};
use profnet_types::Handle;
use profnet_types::api::{LoginRequest, SignupRequest};

use crate::console::Console;

const RULE: &str = "---------------";
const BANNER: &str = "
*******************************************************
              User Interface
*******************************************************
";

pub fn run<S, R, W>(store: &S, console: &mut Console<R, W>) -> Result<()>
where
    S: RecordStore + ?Sized,
    R: BufRead,
    W: Write,
{
    console.say(BANNER)?;

    loop {
        console.say("LOGIN")?;
        console.say("-----")?;
        console.say("1. Create user")?;
        console.say("2. Log in")?;
        console.say("9. < EXIT")?;

        let Some(choice) = console.read_choice()? else {
            break;
        };
        match choice {
            1 => create_user(store, console)?,
            2 => {
                if let Some(handle) = log_in(store, console)? {
                    main_menu(store, console, &handle)?;
                }
            }
            9 => break,
            _ => console.say("Unrecognized choice!")?,
        }
    }

    console.say("Disconnecting from database...Done\n\nBye !")?;
    Ok(())
}

fn report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    action: &str,
    err: impl Display,
) -> Result<()> {
    warn!("Failed while {}: {}", action, err);
    console.say(format!("An error occurred while {}: {}", action, err))?;
    Ok(())
}

fn create_user<S, R, W>(store: &S, console: &mut Console<R, W>) -> Result<()>
where
    S: RecordStore + ?Sized,
    R: BufRead,
    W: Write,
{
    let handle = loop {
        let Some(raw) = console.prompt("\tEnter user login: ")? else {
            return Ok(());
        };
        match check_handle(store, &raw) {
            Ok(handle) => break handle,
            Err(AccountError::Store(e)) => return report(console, "creating your account", e),
            Err(e) => console.say(format!("\t{}. Please try another.", e))?,
        }
    };

    let Some(password) = console.prompt("\tEnter user password: ")? else {
        return Ok(());
    };
    let Some(email) = console.prompt("\tEnter user email: ")? else {
        return Ok(());
    };

    let req = SignupRequest {
        handle: handle.into_string(),
        password,
        email,
    };
    match account::signup(store, &req) {
        Ok(_) => console.say("User successfully created!")?,
        Err(AccountError::Store(e)) => report(console, "creating your account", e)?,
        Err(e) => console.say(format!("User was not created: {}.", e))?,
    }
    Ok(())
}

fn log_in<S, R, W>(store: &S, console: &mut Console<R, W>) -> Result<Option<Handle>>
where
    S: RecordStore + ?Sized,
    R: BufRead,
    W: Write,
{
    let Some(handle) = console.prompt("\tEnter user login: ")? else {
        return Ok(None);
    };
    let Some(password) = console.prompt("\tEnter user password: ")? else {
        return Ok(None);
    };

    match account::login(store, &LoginRequest { handle, password }) {
        Ok(handle) => Ok(Some(handle)),
        Err(AccountError::InvalidCredentials) => {
            console.say("Invalid username or password! Please try logging in again")?;
            Ok(None)
        }
        Err(e) => {
            report(console, "logging in", e)?;
            Ok(None)
        }
    }
}

fn main_menu<S, R, W>(store: &S, console: &mut Console<R, W>, handle: &Handle) -> Result<()>
where
    S: RecordStore + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        // fresh view of friends and requests every time the menu is shown
        let snapshot = match Snapshot::load(store, handle.as_str()) {
            Ok(snapshot) => snapshot,
            Err(e) => return report(console, "loading your account", e),
        };

        console.say("MAIN MENU")?;
        console.say("---------")?;
        console.say("1. Go to Friend List")?;
        console.say("2. Update Profile")?;
        console.say("3. Send Friend Request")?;
        if snapshot.has_pending() {
            console.say("4. You have new friend requests! Choose 4 to accept or reject them.")?;
        } else {
            console.say("4. You have no new friend requests :(")?;
        }
        console.say("9. Log out")?;

        let Some(choice) = console.read_choice()? else {
            return Ok(());
        };
        match choice {
            1 => friend_list(console, &snapshot)?,
            2 => update_profile(store, console, &snapshot)?,
            3 => send_request(store, console, &snapshot)?,
            4 => manage_requests(store, console, &snapshot)?,
            9 => return Ok(()),
            _ => console.say("Unrecognized choice!")?,
        }
    }
}

fn friend_list<R: BufRead, W: Write>(console: &mut Console<R, W>, snapshot: &Snapshot) -> Result<()> {
    console.say("FRIENDS")?;
    console.say("-------")?;
    for friend in snapshot.friend_handles() {
        console.say(friend)?;
    }
    console.say("-------")?;
    Ok(())
}

fn update_profile<S, R, W>(store: &S, console: &mut Console<R, W>, snapshot: &Snapshot) -> Result<()>
where
    S: RecordStore + ?Sized,
    R: BufRead,
    W: Write,
{
    let profile = snapshot.profile();
    console.say("UPDATE PROFILE")?;
    console.say(RULE)?;
    console.say(format!("Username: {}", profile.handle))?;
    console.say(format!("Email: {}", profile.email))?;
    console.say(format!("Member since: {}", profile.created_at.format("%Y-%m-%d")))?;
    console.say(RULE)?;
    console.say("1. Change Password")?;
    console.say("9. Back")?;

    if console.read_choice()? != Some(1) {
        return Ok(());
    }

    loop {
        let Some(new_password) = console.prompt("Please type your new password: ")? else {
            return Ok(());
        };
        let Some(confirm) = console.prompt("Please re-type your new password: ")? else {
            return Ok(());
        };

        match account::change_password(store, &profile.handle, &new_password, &confirm) {
            Ok(()) => {
                console.say("Password updated.")?;
                return Ok(());
            }
            Err(e @ (AccountError::PasswordMismatch | AccountError::EmptyPassword)) => {
                console.say(format!("{}! Please try again.", e))?;
            }
            Err(e) => return report(console, "updating your password", e),
        }
    }
}

fn send_request<S, R, W>(store: &S, console: &mut Console<R, W>, snapshot: &Snapshot) -> Result<()>
where
    S: RecordStore + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut label = "Enter the user to send your friend request to or exit to exit: ";

    loop {
        let Some(line) = console.prompt(label)? else {
            return Ok(());
        };
        let target = line.trim();
        if target == "exit" {
            return Ok(());
        }

        let outcome = match evaluate_request(store, snapshot, target) {
            Ok(outcome) => outcome,
            Err(e) => return report(console, "sending your connection request", e),
        };

        match outcome {
            Admission::Sent(route) => {
                if route == Route::WithinReach {
                    console.say(format!("Found a match! You can add {}! :)", target))?;
                }
                console.say("Friend request sent.")?;
            }
            Admission::Refused(Refusal::UnknownUser) => {
                label = "That user doesn't exist! Please enter an existing user or exit to exit: ";
                continue;
            }
            Admission::Refused(Refusal::AlreadyFriends) => {
                console.say(format!("You are already friends with {}!", target))?;
            }
            Admission::Refused(Refusal::AlreadyPending) => {
                console.say(format!(
                    "There is already a pending friend request between you and {}.",
                    target
                ))?;
            }
            Admission::Refused(Refusal::OutOfReach) => {
                console.say(format!("Sorry, you cannot add {}.", target))?;
            }
            Admission::Refused(refusal @ Refusal::SelfRequest) => {
                console.say(format!("Sorry, {}.", refusal))?;
            }
        }
        return Ok(());
    }
}

fn manage_requests<S, R, W>(store: &S, console: &mut Console<R, W>, snapshot: &Snapshot) -> Result<()>
where
    S: RecordStore + ?Sized,
    R: BufRead,
    W: Write,
{
    console.say("MANAGE REQUESTS")?;
    console.say(RULE)?;

    let mut triage = Triage::new(snapshot);
    list_pending(console, &triage)?;

    while !triage.is_done() {
        console.say(RULE)?;
        console.say(
            "Type y <username> to accept friend request and n <username> to deny friend request or exit to exit.",
        )?;
        let Some(line) = console.prompt("-->")? else {
            return Ok(());
        };

        match triage.apply(store, &line) {
            Ok(TriageStep::Finished) => break,
            Ok(TriageStep::Accepted(handle)) => {
                console.say(format!("You and {} are now friends!", handle))?;
                console.say(RULE)?;
                list_pending(console, &triage)?;
            }
            Ok(TriageStep::Rejected(handle)) => {
                console.say(format!("You rejected {}'s friend request.", handle))?;
                console.say(RULE)?;
                list_pending(console, &triage)?;
            }
            Ok(TriageStep::Invalid(e)) => console.say(e)?,
            Err(e) => report(console, "answering that request", e)?,
        }
    }

    if triage.is_done() {
        console.say("You have no pending requests!")?;
    }
    console.say("exiting...")?;
    Ok(())
}

fn list_pending<R: BufRead, W: Write>(console: &mut Console<R, W>, triage: &Triage) -> Result<()> {
    for handle in triage.pending() {
        console.say(format!("{} wants to be your friend!", handle))?;
    }
    Ok(())
}
