//! Line-oriented development harness.
//!
//! The production chat transport is an external collaborator; this REPL
//! stands in for it, feeding the dispatcher from stdin against the
//! in-memory gateway. `:`-prefixed meta commands play the part of the
//! platform UI (switching users, renaming or deleting containers) so the
//! event-synchronization paths can be exercised end to end.

use crate::config::BotConfig;
use crate::dispatch::Dispatcher;
use crate::events;
use crate::request::{GroupAction, Request};
use std::sync::Arc;
use tavern_core::gateway::Gateway;
use tavern_core::memory::MemoryGateway;
use tavern_core::provision;
use tavern_core::types::{Caller, UserId};
use tavern_core::Registry;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

pub async fn run(config: BotConfig) -> anyhow::Result<()> {
    let (gateway, event_rx) = MemoryGateway::new();
    let gateway = Arc::new(gateway);
    let gateway_dyn: Arc<dyn Gateway> = gateway.clone();
    let registry = Arc::new(Registry::new());
    provision::seed_registry(gateway_dyn.as_ref(), &registry).await?;

    let dispatcher = Dispatcher::new(gateway_dyn.clone(), registry.clone());
    tokio::spawn(events::run(gateway_dyn, registry.clone(), event_rx));

    info!(prefix = %config.command_prefix, "sandbox ready; type :help");
    let mut user = UserId(1);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(meta) = line.strip_prefix(':') {
            if !handle_meta(meta, &gateway, &registry, &mut user).await? {
                break;
            }
            continue;
        }
        let Some(command) = line.strip_prefix(&config.command_prefix) else {
            println!("(ignored; commands start with `{}`)", config.command_prefix);
            continue;
        };
        let caller = Caller {
            user,
            admin: config.is_admin(user),
        };
        match parse_command(command) {
            Some(request) => println!("{}", dispatcher.dispatch(caller, request).await),
            None => println!("Invalid command passed..."),
        }
    }
    Ok(())
}

/// `true` to keep reading, `false` on `:quit`.
async fn handle_meta(
    meta: &str,
    gateway: &MemoryGateway,
    registry: &Registry,
    user: &mut UserId,
) -> anyhow::Result<bool> {
    let mut parts = meta.split_whitespace();
    match parts.next() {
        Some("quit") => return Ok(false),
        Some("user") => match parts.next().and_then(|t| t.parse().ok()) {
            Some(id) => {
                *user = UserId(id);
                println!("(acting as user {id})");
            }
            None => println!("usage: :user <id>"),
        },
        Some("rename") => {
            let (group, rest) = (parts.next(), parts.collect::<Vec<_>>().join(" "));
            match group.and_then(|g| registry.lookup(g)) {
                Some(handle) if !rest.is_empty() => {
                    gateway.rename_container(handle.container_id(), &rest)?;
                    println!("(container renamed)");
                }
                _ => println!("usage: :rename <group> <new name>"),
            }
        }
        Some("delete") => match parts.next().and_then(|g| registry.lookup(g)) {
            Some(handle) => {
                gateway.remove_container(handle.container_id())?;
                println!("(container deleted)");
            }
            None => println!("usage: :delete <group>"),
        },
        _ => println!(":user <id> | :rename <group> <name> | :delete <group> | :quit"),
    }
    Ok(true)
}

/// Parse one prefixed command line into a request. The real framework
/// delivers invocations already parsed; this covers only the sandbox.
fn parse_command(command: &str) -> Option<Request> {
    let mut parts = command.split_whitespace();
    let head = parts.next()?;
    match head {
        "create-group" | "make-group" | "new-group" | "create" => {
            let name = parts.collect::<Vec<_>>().join(" ");
            Some(Request::Create {
                name: (!name.is_empty()).then_some(name),
            })
        }
        "clear-groups" => Some(Request::PurgeGroups),
        group => {
            let action = match parts.next()? {
                "add" => GroupAction::AddMember {
                    target: parts.next().and_then(parse_user),
                },
                "kick" => GroupAction::KickMember {
                    target: parts.next().and_then(parse_user),
                },
                "leave" => GroupAction::Leave,
                "gm" => match parts.next()? {
                    "add" => GroupAction::AddGm {
                        target: parts.next().and_then(parse_user),
                    },
                    "resign" => GroupAction::ResignGm,
                    _ => return None,
                },
                _ => return None,
            };
            Some(Request::Group {
                group: group.to_string(),
                action,
            })
        }
    }
}

fn parse_user(token: &str) -> Option<UserId> {
    token
        .trim_start_matches("<@")
        .trim_start_matches('@')
        .trim_end_matches('>')
        .parse()
        .ok()
        .map(UserId)
}
