use crate::constants::*;
use crate::dom::{create_div, element_by_id, set_style, set_text};
use crate::style::{feedback_top, lane_background, note_class, progress_width, px};
use anyhow::anyhow;
use drum_core::{ActiveNote, FeedbackBoard, InputAdapter, Lane, NoteId, PlayfieldParams};
use fnv::FnvHashMap;
use web_sys as web;

struct LaneView {
    column: web::HtmlElement,
    label: web::HtmlElement,
    pressed: bool,
    text: &'static str,
}

/// DOM for the three lanes, their falling notes and hit labels.
///
/// Writes to the DOM only when the displayed value changes, except note
/// positions which move every frame.
pub struct Playfield {
    document: web::Document,
    root: web::HtmlElement,
    lanes: Vec<LaneView>,
    notes: FnvHashMap<NoteId, web::HtmlElement>,
    timebar: Option<web::HtmlElement>,
}

impl Playfield {
    pub fn mount(
        document: &web::Document,
        container: &web::HtmlElement,
        params: &PlayfieldParams,
    ) -> anyhow::Result<Self> {
        let root = create_div(document, GAME_CONTAINER_CLASS)?;
        let mut lanes = Vec::with_capacity(Lane::ALL.len());
        for lane in Lane::ALL {
            let class = format!("{}{}", LANE_CLASS_PREFIX, lane.index() + 1);
            let column = create_div(document, &class)?;
            set_style(&column, "position", "relative");
            set_style(&column, "background-color", lane_background(lane.index(), false));

            let target = create_div(document, TARGET_LINE_CLASS)?;
            set_style(&target, "position", "absolute");
            set_style(&target, "top", &px(params.target_line_y));

            let label = create_div(document, HIT_RESULT_CLASS)?;
            set_style(&label, "position", "absolute");
            set_style(&label, "top", &feedback_top(params.target_line_y));

            column
                .append_child(&target)
                .and_then(|_| column.append_child(&label))
                .and_then(|_| root.append_child(&column))
                .map_err(|e| anyhow!("build lane {}: {:?}", lane, e))?;
            lanes.push(LaneView {
                column,
                label,
                pressed: false,
                text: "",
            });
        }
        container
            .append_child(&root)
            .map_err(|e| anyhow!("attach playfield: {:?}", e))?;

        Ok(Self {
            document: document.clone(),
            root,
            lanes,
            notes: FnvHashMap::default(),
            timebar: element_by_id(document, TIMEBAR_ELAPSED_ID),
        })
    }

    pub fn render(&mut self, notes: &[ActiveNote], feedback: &FeedbackBoard, input: &InputAdapter) {
        for note in notes.iter().filter(|n| n.is_active()) {
            if !self.notes.contains_key(&note.id) {
                let column = &self.lanes[note.lane.index()].column;
                match create_note(&self.document, column, note.lane) {
                    Ok(el) => {
                        self.notes.insert(note.id, el);
                    }
                    Err(e) => {
                        log::warn!("[playfield] {:#}", e);
                        continue;
                    }
                }
            }
            if let Some(el) = self.notes.get(&note.id) {
                set_style(el, "top", &px(note.position_y));
            }
        }
        // hit or missed notes disappear
        self.notes.retain(|id, el| {
            let live = notes.iter().any(|n| n.id == *id && n.is_active());
            if !live {
                el.remove();
            }
            live
        });

        for lane in Lane::ALL {
            let view = &mut self.lanes[lane.index()];
            let pressed = input.pressed(lane);
            if pressed != view.pressed {
                set_style(&view.column, "background-color", lane_background(lane.index(), pressed));
                view.pressed = pressed;
            }
            let text = feedback.label(lane);
            if text != view.text {
                set_text(&view.label, text);
                view.text = text;
            }
        }
    }

    pub fn set_progress(&self, current_sec: f64, duration_sec: f64) {
        if let Some(bar) = &self.timebar {
            set_style(bar, "width", &progress_width(current_sec, duration_sec));
        }
    }

    pub fn clear_notes(&mut self) {
        for (_, el) in self.notes.drain() {
            el.remove();
        }
    }

    pub fn remove(&mut self) {
        self.clear_notes();
        self.root.remove();
    }
}

fn create_note(
    document: &web::Document,
    column: &web::HtmlElement,
    lane: Lane,
) -> anyhow::Result<web::HtmlElement> {
    let el = create_div(document, &note_class(lane.key()))?;
    set_style(&el, "position", "absolute");
    column
        .append_child(&el)
        .map_err(|e| anyhow!("attach note: {:?}", e))?;
    Ok(el)
}
