//! Interactive host console
//!
//! Stands in for the host application: prints lines on the client's monitor,
//! polls the pending command and reads widget samples. The line editor blocks,
//! so [`run_repl`] is meant for `spawn_blocking`; each command is executed on
//! the runtime through the [`DispatcherHandle`].

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::runtime::Handle;

use crate::dispatcher::DispatcherHandle;
use crate::widgets::WidgetKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Print(String),
    Poll,
    Clear,
    Sample(WidgetKind),
    Message,
    Ack,
    Status,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "print" | "p" => Self::Print(rest.to_string()),
            "poll" => Self::Poll,
            "clear" => Self::Clear,
            "sample" | "s" => {
                let kind = WidgetKind::from_name(rest).ok_or_else(|| {
                    format!(
                        "unknown widget '{}' (expected one of: {})",
                        rest,
                        widget_names()
                    )
                })?;
                Self::Sample(kind)
            },
            "message" | "msg" => Self::Message,
            "ack" => Self::Ack,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{}' (try 'help')", other)),
        };

        Ok(Some(command))
    }
}

fn widget_names() -> String {
    WidgetKind::ALL
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run one command, returning the text to show
pub async fn execute(command: &ConsoleCommand, dispatcher: &DispatcherHandle) -> String {
    match command {
        ConsoleCommand::Print(text) => {
            dispatcher.send_line(text.clone());
            if dispatcher.is_connected().await {
                format!("{} {}", "sent".green(), text)
            } else {
                "no client connected, line dropped".yellow().to_string()
            }
        },
        ConsoleCommand::Poll => match dispatcher.take_pending().await {
            Some((command, true)) => format!("{} {}", "pending:".green(), command),
            Some((_, false)) => "no new command".dimmed().to_string(),
            None => actor_gone(),
        },
        ConsoleCommand::Clear => {
            dispatcher.clear_pending();
            "pending command cleared".to_string()
        },
        ConsoleCommand::Sample(kind) => match dispatcher.sample(*kind).await {
            Some(s) => format!(
                "{}: r={} theta={} x={} y={} intensity={} button={}",
                kind.to_string().cyan(),
                s.r,
                s.theta,
                s.x,
                s.y,
                s.intensity,
                s.button_state
            ),
            None => actor_gone(),
        },
        ConsoleCommand::Message => match dispatcher.last_message().await {
            Some((text, arrived)) => {
                let flag = if arrived { "new".green() } else { "seen".dimmed() };
                format!("[{}] {}", flag, text)
            },
            None => actor_gone(),
        },
        ConsoleCommand::Ack => {
            dispatcher.clear_message_flag();
            "message flag cleared".to_string()
        },
        ConsoleCommand::Status => match dispatcher.status().await {
            Some(status) => format!(
                "{} client {} at {}",
                "connected:".green(),
                status.peer,
                status.address
            ),
            None => "idle".yellow().to_string(),
        },
        ConsoleCommand::Help => help_text(),
        ConsoleCommand::Quit => "bye".to_string(),
    }
}

fn actor_gone() -> String {
    "dispatcher is not running".red().to_string()
}

fn help_text() -> String {
    format!(
        "{}\n  print <text>    show a line on the client monitor\n  poll            read the pending command\n  clear           clear the pending command\n  sample <kind>   read a widget sample ({})\n  message         last raw frame and its arrived flag\n  ack             clear the message arrived flag\n  status          connection state\n  quit            stop padlink",
        "Commands:".bold(),
        widget_names()
    )
}

/// Blocking read-eval-print loop; returns when the user quits or closes input
pub fn run_repl(dispatcher: DispatcherHandle, runtime: Handle) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    loop {
        let line = match rl.readline("padlink> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message.red());
                continue;
            },
        };
        let _ = rl.add_history_entry(line.as_str());

        println!("{}", runtime.block_on(execute(&command, &dispatcher)));
        if command == ConsoleCommand::Quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{DispatcherActor, ProtocolDispatcher};
    use crate::network::NetworkInfo;
    use crate::transport::PeerRegistry;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse("   "), Ok(None));
        assert_eq!(
            ConsoleCommand::parse("print hello  world"),
            Ok(Some(ConsoleCommand::Print("hello  world".to_string())))
        );
        assert_eq!(
            ConsoleCommand::parse("print"),
            Ok(Some(ConsoleCommand::Print(String::new())))
        );
        assert_eq!(ConsoleCommand::parse("POLL"), Ok(Some(ConsoleCommand::Poll)));
        assert_eq!(
            ConsoleCommand::parse("sample cpk"),
            Ok(Some(ConsoleCommand::Sample(WidgetKind::ColorPicker)))
        );
        assert_eq!(ConsoleCommand::parse("exit"), Ok(Some(ConsoleCommand::Quit)));
        assert!(ConsoleCommand::parse("sample wheel").is_err());
        assert!(ConsoleCommand::parse("launch").is_err());
    }

    #[tokio::test]
    async fn test_execute_against_actor() {
        colored::control::set_override(false);

        let registry = Arc::new(PeerRegistry::new());
        let network = Arc::new(NetworkInfo::with_detected(
            "pad",
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            None,
        ));
        let handle = DispatcherActor::spawn(ProtocolDispatcher::new(registry.clone(), network));

        assert_eq!(execute(&ConsoleCommand::Status, &handle).await, "idle");

        let (peer, _outbound) = registry.register();
        handle.on_connect(peer, "127.0.0.1:5000".parse().unwrap());
        handle.on_frame(peer, "serial,forward".to_string());
        handle.on_frame(peer, "slider,0.25".to_string());

        assert_eq!(
            execute(&ConsoleCommand::Poll, &handle).await,
            "pending: forward"
        );
        assert!(execute(&ConsoleCommand::Sample(WidgetKind::Slider), &handle)
            .await
            .contains("intensity=0.25"));
        assert_eq!(
            execute(&ConsoleCommand::Message, &handle).await,
            "[new] slider,0.25"
        );
        assert!(execute(&ConsoleCommand::Status, &handle)
            .await
            .contains(&peer.to_string()));

        execute(&ConsoleCommand::Clear, &handle).await;
        assert_eq!(
            execute(&ConsoleCommand::Poll, &handle).await,
            "no new command"
        );
    }
}
