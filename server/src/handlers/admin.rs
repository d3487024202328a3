use actix_web::{error, web, Responder, Result};
use askama_actix::{Template, TemplateToResponse};

use canvas::CanvasSnapshot;

use crate::admin::AdminCommand;
use crate::server::{ServerCommand, ServerTx};

struct RectangleRow {
    id: String,
    position: String,
    size: String,
    fill: String,
    created_by: String,
}

#[derive(Template)]
#[template(path = "admin-canvas.html")]
pub struct AdminCanvasTemplate {
    connected_users: usize,
    rows: Vec<RectangleRow>,
}

impl From<CanvasSnapshot> for AdminCanvasTemplate {
    fn from(snapshot: CanvasSnapshot) -> Self {
        Self {
            connected_users: snapshot.connected_users,
            rows: snapshot
                .rectangles
                .iter()
                .map(|r| RectangleRow {
                    id: r.id.to_string(),
                    position: format!("({}, {})", r.x, r.y),
                    size: format!("{} x {}", r.width, r.height),
                    fill: r.fill.clone(),
                    created_by: r
                        .created_by
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect(),
        }
    }
}

pub fn configure_admin_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin").service(web::resource("/canvas").route(web::get().to(show_canvas))),
    );
}

async fn show_canvas(srv_tx: web::Data<ServerTx>) -> Result<impl Responder> {
    let (tx, rx) = tokio::sync::oneshot::channel::<CanvasSnapshot>();

    srv_tx
        .get_ref()
        .clone()
        .send(ServerCommand::AdminCommand(AdminCommand::DescribeCanvas {
            tx,
        }))
        .await
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    let snapshot = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?;

    Ok(AdminCanvasTemplate::from(snapshot).to_response())
}
