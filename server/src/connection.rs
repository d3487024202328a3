use actix::{Actor, ActorContext, AsyncContext, Handler, Message, Running, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use actix_web_actors::ws::{CloseCode, CloseReason};

use canvas::{serde_json, ClientIntent, ConnectionId, ServerEvent};

use crate::connection_tx_storage::ConnectionTx;
use crate::server::{ServerCommand, ServerTx};

#[derive(Debug)]
pub enum ConnectionCommand {
    Connect {
        tx: ConnectionTx,
    },
    Disconnect {
        from: ConnectionId,
    },
    Intent {
        from: ConnectionId,
        intent: ClientIntent,
    },
}

#[derive(Debug)]
pub enum ConnectionEvent {
    Joined { connection_id: ConnectionId },
    Event(ServerEvent),
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ConnectionEvent);

enum ConnectionState {
    Connecting,
    Joined(ConnectionId),
}

struct ConnectionActor {
    state: ConnectionState,
    srv_tx: ServerTx,
}

impl ConnectionActor {
    fn notify_disconnect(&self, connection_id: ConnectionId) {
        if let Err(err) = self
            .srv_tx
            .try_send(ServerCommand::ConnectionCommand(
                ConnectionCommand::Disconnect {
                    from: connection_id,
                },
            ))
        {
            log::warn!("Failed to notify disconnect: {}", err);
        }
    }
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<ConnectionEvent>(32);

        if let Err(err) = self.srv_tx.try_send(ServerCommand::ConnectionCommand(
            ConnectionCommand::Connect { tx },
        )) {
            log::error!("Refusing connection, engine unavailable: {}", err);
            ctx.stop();
            return;
        }

        let addr = ctx.address().recipient();

        tokio::spawn(async move {
            let addr = addr;
            log::debug!("connection green thread - started");
            while let Some(msg) = rx.recv().await {
                if let Err(err) = addr.try_send(ConnectionActorMessage(msg)) {
                    log::warn!("Connection mailbox unavailable: {}", err);
                    break;
                }
            }
            log::debug!("connection green thread - terminated");
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        if let ConnectionState::Joined(id) = self.state {
            self.notify_disconnect(id);
        }

        Running::Stop
    }
}

/// Ingress
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Text(text)) => {
                if let ConnectionState::Joined(from) = self.state {
                    if let Ok(intent) = serde_json::from_str::<ClientIntent>(&text) {
                        log::debug!("Ingress {:?}", intent);
                        if let Err(err) = self.srv_tx.try_send(ServerCommand::ConnectionCommand(
                            ConnectionCommand::Intent { from, intent },
                        )) {
                            log::warn!("Dropping intent, engine channel full: {}", err);
                        }
                    } else {
                        log::warn!("Closing connection {} on malformed payload", from);
                        ctx.close(Some(CloseReason {
                            code: CloseCode::Invalid,
                            description: None,
                        }));
                    }
                } else {
                    log::debug!("Dropping frame received before join completed");
                }
            }
            Ok(ws::Message::Close(_)) => {
                if let ConnectionState::Joined(id) = self.state {
                    self.notify_disconnect(id);
                }
                ctx.stop();
            }
            _ => (),
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        let connection_event = &msg.0;
        log::debug!("Egress {:?}", connection_event);
        match connection_event {
            ConnectionEvent::Joined { connection_id } => {
                self.state = ConnectionState::Joined(*connection_id);
            }
            ConnectionEvent::Event(event) => match serde_json::to_string(event) {
                Ok(serialized) => ctx.text(serialized),
                Err(err) => log::error!("Failed to serialize egress event: {}", err),
            },
        }
    }
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    srv_tx: web::Data<ServerTx>,
) -> Result<HttpResponse, Error> {
    ws::start(
        ConnectionActor {
            srv_tx: srv_tx.get_ref().clone(),
            state: ConnectionState::Connecting,
        },
        &req,
        stream,
    )
}
