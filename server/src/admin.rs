use canvas::CanvasSnapshot;
use tokio::sync::oneshot::Sender;

/// Read-only queries answered inline by the engine loop.
#[derive(Debug)]
pub enum AdminCommand {
    GetStatus { tx: Sender<ServerStatus> },
    DescribeCanvas { tx: Sender<CanvasSnapshot> },
}

#[derive(Debug)]
pub struct ServerStatus {
    pub connected_users: usize,
    pub rectangle_count: usize,
}
