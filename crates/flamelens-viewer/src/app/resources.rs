use bevy::prelude::Resource;
use crossbeam_channel::Receiver;

use crate::ui::tooltips::HoverEvent;
use crate::worker::{WorkerEvent, WorkerHandle};

#[derive(Resource)]
pub struct WorkerRx(pub Receiver<WorkerEvent>);

#[derive(Resource)]
pub struct Worker(pub WorkerHandle);

#[derive(Resource)]
pub struct HoverRx(pub Receiver<HoverEvent>);
