//! Implementation for the `replay` subcommand.
//!
//! A script is a RON list of steps:
//!
//! ```ron
//! [
//!     edit(true),
//!     down(widget: 1, kind: drag, x: 10.0, y: 10.0),
//!     move(x: 110.0, y: 10.0),
//!     up(x: 110.0, y: 10.0),
//!     down(widget: "notes", kind: resize(bottom_right), x: 0.0, y: 0.0),
//!     move(x: 50.0, y: 32.0),
//!     up(x: 50.0, y: 32.0),
//!     fail_saves(true),
//!     settle,
//!     width(1400.0),
//!     save,
//! ]
//! ```

use std::{
    fs,
    io::{self, Write},
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use config::Config;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tilegrid_engine::{
    EditorView, Effect, Error as EngineError, GestureKind, LayoutGateway, PointerPos,
    Result as EngineResult, SaveOutcome, Transition,
};
use tilegrid_ids::WidgetId;
use tilegrid_protocol::{
    LayoutRecord, MsgToHost, SaveLayoutRequest, SaveResponse, SaveWidgetRequest, codec,
    ipc::host_channel,
};
use tokio::runtime::Builder;
use tracing::{debug, info, warn};

use crate::{
    cli::ReplayArgs,
    error::{Error, Result},
};

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Flip the edit/save toggle without saving.
    Edit(bool),
    /// Pointer-down on a widget body or handle.
    Down {
        /// Target widget.
        widget: WidgetId,
        /// Body or handle.
        kind: GestureKind,
        /// Pointer x in container pixels.
        x: f64,
        /// Pointer y in container pixels.
        y: f64,
    },
    /// Pointer-move.
    Move {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// Pointer-up.
    Up {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// Resize the container.
    Width(f64),
    /// The Save action: leave edit mode and save the full layout.
    Save,
    /// Make every following save fail (or succeed again).
    FailSaves(bool),
    /// Wait for all issued saves to resolve.
    Settle,
}

/// Parse a RON gesture script.
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    ron::from_str(text).map_err(|e| Error::script(e.to_string()))
}

/// Read and decode a JSON layout file.
pub fn read_layout(path: &Path) -> Result<Vec<LayoutRecord>> {
    let text = fs::read_to_string(path)?;
    Ok(codec::decode_layout(&text)?)
}

/// Save body tagged with the endpoint it would be posted to.
#[derive(Serialize)]
struct SaveLine<'a, T> {
    /// `layout` or `widget`.
    save: &'static str,
    /// Request body.
    body: &'a T,
}

/// Gateway that writes every save as one JSON line instead of posting it.
pub struct JsonLinesGateway {
    /// Output sink.
    out: Mutex<Box<dyn Write + Send>>,
    /// Answer with a transport error instead of success.
    fail: AtomicBool,
}

impl JsonLinesGateway {
    /// Gateway writing to `out`.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            fail: AtomicBool::new(false),
        }
    }

    /// Make subsequent saves fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Write one line, then answer per the failure switch.
    fn emit<T: Serialize>(&self, save: &'static str, body: &T) -> EngineResult<SaveResponse> {
        let line = codec::encode(&SaveLine { save, body })?;
        let mut out = self.out.lock();
        writeln!(out, "{line}")
            .and_then(|()| out.flush())
            .map_err(|e| EngineError::Transport(e.to_string()))?;
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::Transport("scripted failure".into()));
        }
        Ok(SaveResponse::ok())
    }
}

#[async_trait]
impl LayoutGateway for JsonLinesGateway {
    async fn save_layout(&self, req: SaveLayoutRequest) -> EngineResult<SaveResponse> {
        self.emit("layout", &req)
    }

    async fn save_widget(&self, req: SaveWidgetRequest) -> EngineResult<SaveResponse> {
        self.emit("widget", &req)
    }
}

/// What a replay left behind.
#[derive(Debug)]
pub struct Report {
    /// Final layout, in load order.
    pub layout: Vec<LayoutRecord>,
    /// Every save outcome still tracked at the end, in issue order.
    pub outcomes: Vec<SaveOutcome>,
    /// Host messages, in arrival order.
    pub host: Vec<MsgToHost>,
    /// Gestures that committed.
    pub commits: usize,
    /// Gestures that reverted.
    pub reverts: usize,
}

/// Run `steps` against a fresh view of `records`, writing saves to `gateway`.
pub async fn replay(
    cfg: &Config,
    width: f64,
    records: Vec<LayoutRecord>,
    steps: &[Step],
    gateway: Arc<JsonLinesGateway>,
) -> Result<Report> {
    let (tx, mut rx) = host_channel();
    let mut view = EditorView::new(cfg, width, records, gateway.clone(), tx)?;
    let mut outcomes = Vec::new();
    let (mut commits, mut reverts) = (0, 0);

    for (idx, step) in steps.iter().enumerate() {
        let transition = match step {
            Step::Edit(on) => {
                view.set_edit_mode(*on);
                None
            }
            Step::Down { widget, kind, x, y } => {
                Some(view.pointer_down(widget, *kind, PointerPos::new(*x, *y))?)
            }
            Step::Move { x, y } => Some(view.pointer_move(PointerPos::new(*x, *y))),
            Step::Up { x, y } => Some(view.pointer_up(PointerPos::new(*x, *y))?),
            Step::Width(px) => {
                view.resize_container(*px);
                None
            }
            Step::Save => {
                let seq = view.save_and_exit();
                debug!(step = idx + 1, seq, "save action");
                None
            }
            Step::FailSaves(fail) => {
                gateway.set_fail(*fail);
                None
            }
            Step::Settle => {
                let in_flight = view.persistence().in_flight();
                debug!(step = idx + 1, in_flight, "settling saves");
                outcomes.extend(view.persistence().flush().await);
                None
            }
        };
        if let Some(t) = transition {
            log_transition(idx + 1, &t);
            match t.effect {
                Effect::Committed { .. } => commits += 1,
                Effect::Reverted { .. } => reverts += 1,
                _ => {}
            }
        }
    }
    if view.state().widget().is_some() {
        warn!("script ended with a gesture still active");
    }

    outcomes.extend(view.persistence().flush().await);
    let mut host = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        host.push(msg);
    }
    Ok(Report {
        layout: view.store().records(),
        outcomes,
        host,
        commits,
        reverts,
    })
}

/// Log one transition at a level that matches its effect.
fn log_transition(step: usize, t: &Transition) {
    match &t.effect {
        Effect::Committed { id, rect, .. } => info!(step, id = %id, rect = %rect, "committed"),
        Effect::Reverted { id, reason, .. } => info!(step, id = %id, reason = ?reason, "reverted"),
        other => debug!(step, from = ?t.from, to = ?t.to, effect = ?other, "step"),
    }
}

/// Run the replay workflow.
pub fn run(args: &ReplayArgs) -> Result<()> {
    let cfg = config::load_or_default(args.config.as_deref())?;
    let records = read_layout(&args.layout)?;
    let steps = parse_script(&fs::read_to_string(&args.script)?)?;
    info!(widgets = records.len(), steps = steps.len(), "replaying");

    let gateway = Arc::new(JsonLinesGateway::new(Box::new(io::stdout())));
    let runtime = Builder::new_current_thread().enable_all().build()?;
    let report = runtime.block_on(replay(&cfg, args.width, records, &steps, gateway))?;

    for msg in &report.host {
        if let MsgToHost::Notify { title, text, .. } = msg {
            warn!(title = %title, "{text}");
        }
    }
    let failed = report.outcomes.iter().filter(|o| !o.is_saved()).count();
    info!(
        commits = report.commits,
        reverts = report.reverts,
        saves = report.outcomes.len(),
        failed,
        "replay finished"
    );
    let layout = codec::encode(&SaveLayoutRequest {
        layout: report.layout,
    })?;
    println!("{layout}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tilegrid_engine::Handle;
    use tilegrid_geom::Rect;
    use tilegrid_protocol::SaveScope;

    use super::*;

    /// Shared in-memory sink.
    #[derive(Clone, Default)]
    struct Buf(Arc<Mutex<Vec<u8>>>);

    impl Write for Buf {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(data);
            Ok(data.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buf {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn layout() -> Vec<LayoutRecord> {
        vec![
            LayoutRecord::new(WidgetId::Int(1), Rect::new(1, 4, 1, 3)),
            LayoutRecord::new(WidgetId::Int(2), Rect::new(5, 4, 1, 3)),
        ]
    }

    #[test]
    fn parses_every_step_kind() {
        let steps = parse_script(
            r#"[
                edit(true),
                down(widget: 1, kind: drag, x: 10.0, y: 10.0),
                down(widget: "notes", kind: resize(top_left), x: 0.0, y: 0.0),
                move(x: 110.0, y: 10.0),
                up(x: 110.0, y: 10.0),
                width(1400.0),
                fail_saves(true),
                settle,
                save,
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 9);
        assert_eq!(
            steps[1],
            Step::Down {
                widget: WidgetId::Int(1),
                kind: GestureKind::Drag,
                x: 10.0,
                y: 10.0
            }
        );
        assert!(matches!(
            &steps[2],
            Step::Down { widget: WidgetId::Name(n), kind: GestureKind::Resize(Handle::TopLeft), .. }
                if n == "notes"
        ));
        assert_eq!(steps[8], Step::Save);
    }

    #[test]
    fn demo_files_parse() {
        let steps = parse_script(include_str!("../../../demos/drag.ron")).unwrap();
        assert_eq!(steps.first(), Some(&Step::Edit(true)));
        assert_eq!(steps.last(), Some(&Step::Save));
        let cfg = Config::from_ron(include_str!("../../../demos/config.ron")).unwrap();
        assert_eq!(cfg.interaction.drag_threshold_px, 4.0);
        let records = codec::decode_layout(include_str!("../../../demos/dashboard.json")).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn bad_script_is_script_error() {
        let err = parse_script("[jump(x: 1.0)]").unwrap_err();
        assert!(matches!(err, Error::Script(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn replay_prints_saves_and_final_layout() {
        let buf = Buf::default();
        let gw = Arc::new(JsonLinesGateway::new(Box::new(buf.clone())));
        let steps = parse_script(
            r#"[
                edit(true),
                down(widget: 1, kind: drag, x: 0.0, y: 0.0),
                move(x: 100.0, y: 0.0),
                up(x: 100.0, y: 0.0),
                down(widget: 1, kind: drag, x: 0.0, y: 0.0),
                move(x: 0.0, y: 96.0),
                up(x: 0.0, y: 96.0),
                settle,
                save,
            ]"#,
        )
        .unwrap();
        let report = replay(&Config::default(), 1000.0, layout(), &steps, gw)
            .await
            .unwrap();

        assert_eq!((report.commits, report.reverts), (1, 1));
        assert_eq!(report.layout[0].rect, Rect::new(1, 4, 4, 3));
        assert_eq!(
            buf.lines(),
            vec![
                r#"{"save":"widget","body":{"id":1,"colStart":1,"colSpan":4,"rowStart":4,"rowSpan":3}}"#
                    .to_string(),
                concat!(
                    r#"{"save":"layout","body":{"layout":["#,
                    r#"{"id":1,"colStart":1,"colSpan":4,"rowStart":4,"rowSpan":3},"#,
                    r#"{"id":2,"colStart":5,"colSpan":4,"rowStart":1,"rowSpan":3}]}}"#
                )
                .to_string(),
            ]
        );
        assert!(report.outcomes.iter().all(SaveOutcome::is_saved));
        assert_eq!(
            report.host.last(),
            Some(&MsgToHost::Saved {
                scope: SaveScope::Layout,
                seq: 2
            })
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn scripted_failure_keeps_local_layout() {
        let buf = Buf::default();
        let gw = Arc::new(JsonLinesGateway::new(Box::new(buf.clone())));
        let steps = parse_script(
            r#"[
                edit(true),
                fail_saves(true),
                down(widget: 2, kind: resize(bottom_right), x: 0.0, y: 0.0),
                move(x: 50.0, y: 32.0),
                up(x: 50.0, y: 32.0),
            ]"#,
        )
        .unwrap();
        let report = replay(&Config::default(), 1000.0, layout(), &steps, gw)
            .await
            .unwrap();
        assert_eq!(report.layout[1].rect, Rect::new(5, 5, 1, 4));
        assert_eq!(report.outcomes.len(), 1);
        assert!(!report.outcomes[0].is_saved());
        assert!(
            report
                .host
                .iter()
                .any(|m| matches!(m, MsgToHost::Notify { .. }))
        );
        assert_eq!(buf.lines().len(), 1);
    }
}
