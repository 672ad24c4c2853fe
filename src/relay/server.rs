use std::collections::HashMap;

use actix::prelude::*;

/// Outbound broadcast payload delivered to one connected session.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Event(pub String);

#[derive(Message)]
#[rtype(usize)]
pub struct Connect {
    pub addr: Recipient<Event>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: usize,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Broadcast(pub String);

/// Keeps the set of connected listeners and fans events out to all of them.
/// Delivery is best effort: a listener whose mailbox cannot take the message
/// is dropped from the set, the others are unaffected, and the mutation that
/// produced the event never learns about it.
pub struct RelayServer {
    sessions: HashMap<usize, Recipient<Event>>,
    next_id: usize,
}

impl RelayServer {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            next_id: 0,
        }
    }

    fn broadcast(&mut self, message: &str) {
        let mut dead = Vec::new();
        for (id, addr) in &self.sessions {
            if addr.try_send(Event(message.to_owned())).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            tracing::warn!(session = id, "dropping unreachable listener");
            self.sessions.remove(&id);
        }
    }
}

impl Default for RelayServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for RelayServer {
    type Context = Context<Self>;
}

impl Handler<Connect> for RelayServer {
    type Result = usize;

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) -> Self::Result {
        self.next_id += 1;
        self.sessions.insert(self.next_id, msg.addr);
        tracing::debug!(session = self.next_id, "listener connected");
        self.next_id
    }
}

impl Handler<Disconnect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        self.sessions.remove(&msg.id);
        tracing::debug!(session = msg.id, "listener disconnected");
    }
}

impl Handler<Broadcast> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Broadcast, _: &mut Context<Self>) {
        self.broadcast(&msg.0);
    }
}
