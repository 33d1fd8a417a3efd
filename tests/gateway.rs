//! Gateway routing between surfaces.

mod common;

use chatcmd::{Caller, CommandOutcome, Environment, Gateway};
use common::*;
use std::sync::Arc;

#[test]
fn test_replies_routed_per_environment() {
    let engine = Arc::new(engine_with_samples(""));
    let chat = Arc::new(RecordingChannel::default());
    let console = Arc::new(RecordingChannel::default());

    let mut gateway = Gateway::new(engine);
    gateway
        .bind(Environment::Chat, chat.clone())
        .bind(Environment::Console, console.clone());

    let alice = Caller::user(1, "alice");
    let root = Caller::user(0, "console");

    assert_eq!(
        gateway.handle(&alice, Environment::Chat, ".add 20 22"),
        Some(CommandOutcome::Succeeded)
    );
    assert_eq!(
        gateway.handle(&root, Environment::Console, ".ping"),
        Some(CommandOutcome::Succeeded)
    );
    assert_eq!(gateway.handle(&alice, Environment::Chat, "good morning"), None);

    assert_eq!(chat.sent(), vec![(alice, "42".to_string())]);
    assert_eq!(console.sent(), vec![(root, "pong".to_string())]);
}

#[test]
fn test_silent_commands_send_nothing() {
    let engine = Arc::new(engine_with_samples(""));
    engine
        .register_command("misc", chatcmd::CommandDescriptor::new("quiet", silent).alias("quiet"))
        .unwrap();
    let chat = Arc::new(RecordingChannel::default());

    let mut gateway = Gateway::new(Arc::clone(&engine));
    gateway.bind(Environment::Chat, chat.clone());

    assert_eq!(
        gateway.handle(&user("bob"), Environment::Chat, ".quiet"),
        Some(CommandOutcome::Succeeded)
    );
    assert!(chat.sent().is_empty());
    assert_eq!(gateway.engine().command_stats().len(), 1);
}
