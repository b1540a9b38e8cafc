//! DOM side of the viewer: the search box, candidate list, detail panel,
//! notice banner and the on-map campus label.
//!
//! The page provides the containers (see the `*_ID` constants); everything
//! inside them is rendered from a [`UiSnapshot`].

use html_escape::{encode_double_quoted_attribute, encode_text};
use navigation::{CampusLabel, DetailView};
use session::{EngineError, MountedControl};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent};

use crate::UiSnapshot;

pub const SEARCH_ROOT_ID: &str = "campus-search";
pub const SEARCH_INPUT_ID: &str = "campus-search-input";
pub const SEARCH_SUBMIT_ID: &str = "campus-search-submit";
pub const SUGGESTIONS_ID: &str = "campus-suggestions";
pub const DETAIL_ID: &str = "campus-detail";
pub const NOTICE_ID: &str = "campus-notice";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn element(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

fn listen(
    target: &Element,
    event: &str,
    capture: bool,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback_and_bool(event, cb.as_ref().unchecked_ref(), capture)?;
    // Page-lifetime listeners.
    cb.forget();
    Ok(())
}

/// `data-*` value of the closest ancestor of the event target matching
/// `selector`.
fn closest_data(ev: &web_sys::Event, selector: &str, attr: &str) -> Option<String> {
    let target = ev.target()?.dyn_into::<Element>().ok()?;
    target.closest(selector).ok()??.get_attribute(attr)
}

/// Hooks the page's UI containers to the viewer. Call once per page.
pub fn wire() -> Result<(), JsValue> {
    let doc = document()?;
    let input = element(&doc, SEARCH_INPUT_ID)?;

    let input_el: HtmlInputElement = input.clone().dyn_into()?;
    listen(&input, "input", false, move |_| crate::ui_query(&input_el.value()))?;
    listen(&input, "focus", false, |_| crate::ui_focus())?;
    // `focusout` bubbles, so focus leaving a candidate schedules a close too.
    listen(&element(&doc, SEARCH_ROOT_ID)?, "focusout", false, |_| crate::ui_blur())?;
    listen(&input, "keydown", false, |ev| {
        if let Some(k) = ev.dyn_ref::<KeyboardEvent>() {
            if k.key() == "Enter" {
                ev.prevent_default();
                crate::ui_submit();
            }
        }
    })?;

    if let Some(submit) = doc.get_element_by_id(SEARCH_SUBMIT_ID) {
        listen(&submit, "click", false, |ev| {
            ev.prevent_default();
            crate::ui_submit();
        })?;
    }

    listen(&element(&doc, SUGGESTIONS_ID)?, "click", false, |ev| {
        if let Some(name) = closest_data(&ev, "li[data-campus]", "data-campus") {
            crate::ui_select(&name);
        }
    })?;

    let detail = element(&doc, DETAIL_ID)?;
    listen(&detail, "click", false, |ev| {
        if closest_data(&ev, "[data-action]", "data-action").as_deref() == Some("dismiss-detail") {
            crate::ui_dismiss_detail();
        }
    })?;
    // Image errors do not bubble.
    listen(&detail, "error", true, |ev| {
        let is_img = ev
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .is_some_and(|el| el.tag_name().eq_ignore_ascii_case("img"));
        if is_img {
            crate::ui_image_error();
        }
    })?;

    listen(&element(&doc, NOTICE_ID)?, "click", false, |ev| {
        if closest_data(&ev, "[data-action]", "data-action").as_deref() == Some("dismiss-notice") {
            crate::ui_dismiss_notice();
        }
    })?;
    Ok(())
}

/// Whether keyboard focus currently rests inside the search control.
pub fn focus_within_search() -> bool {
    let Ok(doc) = document() else {
        return false;
    };
    let (Some(root), Some(active)) = (doc.get_element_by_id(SEARCH_ROOT_ID), doc.active_element())
    else {
        return false;
    };
    let active: &web_sys::Node = active.as_ref();
    root.contains(Some(active))
}

pub fn render(ui: &UiSnapshot) -> Result<(), JsValue> {
    let doc = document()?;

    let input: HtmlInputElement = element(&doc, SEARCH_INPUT_ID)?.dyn_into()?;
    if input.value() != ui.query {
        input.set_value(&ui.query);
    }

    let list = element(&doc, SUGGESTIONS_ID)?;
    let items: String = ui
        .candidates
        .iter()
        .map(|name| {
            format!(
                r#"<li data-campus="{}" tabindex="-1">{}</li>"#,
                encode_double_quoted_attribute(name),
                encode_text(name)
            )
        })
        .collect();
    list.set_inner_html(&items);
    list.toggle_attribute_with_force("hidden", !ui.open)?;

    let detail = element(&doc, DETAIL_ID)?;
    match &ui.detail {
        Some(view) => {
            detail.set_inner_html(&detail_html(view));
            detail.remove_attribute("hidden")?;
        }
        None => detail.set_attribute("hidden", "")?,
    }

    let notice = element(&doc, NOTICE_ID)?;
    match &ui.notice {
        Some(msg) => {
            notice.set_inner_html(&format!(
                r#"<span>{}</span><button type="button" data-action="dismiss-notice">OK</button>"#,
                encode_text(msg)
            ));
            notice.remove_attribute("hidden")?;
        }
        None => notice.set_attribute("hidden", "")?,
    }
    Ok(())
}

fn detail_html(view: &DetailView) -> String {
    let mut html = format!(
        r#"<button type="button" class="close" data-action="dismiss-detail" aria-label="Close">&times;</button><img src="{}" alt="{}"><h3>{}</h3>"#,
        encode_double_quoted_attribute(view.image.url()),
        encode_double_quoted_attribute(&view.name),
        encode_text(&view.name),
    );
    if let Some(address) = &view.address {
        html.push_str(&format!("<p class=\"address\">{}</p>", encode_text(address)));
    }
    if let Some(phone) = &view.contact_number {
        html.push_str(&format!(
            r#"<p class="phone"><a href="tel:{}">{}</a></p>"#,
            encode_double_quoted_attribute(phone),
            encode_text(phone)
        ));
    }
    if let Some(link) = &view.link {
        html.push_str(&format!(
            r#"<p class="link"><a href="{}" target="_blank" rel="noopener">Visit website</a></p>"#,
            encode_double_quoted_attribute(link)
        ));
    }
    html
}

/// The always-visible "nearest / selected campus" label, mounted into the
/// map container.
#[derive(Default)]
pub struct CampusLabelControl {
    on_click: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl CampusLabelControl {
    pub fn update(&self, el: &Element, label: &CampusLabel) {
        let button = if label.can_open_detail {
            r#"<button type="button" data-action="open-detail">Details</button>"#
        } else {
            ""
        };
        el.set_inner_html(&format!("<span>{}</span>{button}", encode_text(&label.text)));
    }
}

impl MountedControl for CampusLabelControl {
    type Host = Element;
    type Handle = Element;

    fn mount(&mut self, host: &Element) -> Result<Element, EngineError> {
        let failed = |e: JsValue| EngineError::Rejected {
            what: "campus label".to_string(),
            reason: e.as_string().unwrap_or_else(|| format!("{e:?}")),
        };
        let doc = document().map_err(failed)?;
        let el = doc.create_element("div").map_err(failed)?;
        el.set_class_name("campus-label mapboxgl-ctrl");

        let cb = Closure::<dyn FnMut(web_sys::Event)>::new(|ev: web_sys::Event| {
            if closest_data(&ev, "[data-action]", "data-action").as_deref() == Some("open-detail") {
                crate::ui_open_active_detail();
            }
        });
        el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .map_err(failed)?;
        host.append_child(&el).map_err(failed)?;
        self.on_click = Some(cb);
        Ok(el)
    }

    fn unmount(&mut self, handle: Element) {
        if let Some(cb) = self.on_click.take() {
            let _ = handle.remove_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        }
        handle.remove();
    }
}
