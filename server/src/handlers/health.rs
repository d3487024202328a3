use actix_web::{error, web, HttpResponse, Responder, Result};

use canvas::chrono::{SecondsFormat, Utc};
use canvas::serde_json::json;

use crate::admin::{AdminCommand, ServerStatus};
use crate::server::{ServerCommand, ServerTx};

pub fn configure_health_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)));
}

async fn health(srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let (tx, rx) = tokio::sync::oneshot::channel::<ServerStatus>();

    srv_tx
        .get_ref()
        .clone()
        .send(ServerCommand::AdminCommand(AdminCommand::GetStatus { tx }))
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    let status = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "connectedUsers": status.connected_users,
        "rectangleCount": status.rectangle_count,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })))
}
