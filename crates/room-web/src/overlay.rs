//! Monitor info panel and the boot loading indicator.

use web_sys as web;

const PANEL_ID: &str = "monitor-panel";
const LOADING_ID: &str = "loading";

#[inline]
pub fn show_panel(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(PANEL_ID) {
        let cl = el.class_list();
        _ = cl.remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide_panel(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(PANEL_ID) {
        let cl = el.class_list();
        _ = cl.add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn panel_visible(document: &web::Document) -> bool {
    match document.get_element_by_id(PANEL_ID) {
        Some(el) => {
            if el.class_list().contains("hidden") {
                return false;
            }
            !el.get_attribute("style")
                .map(|s| s.contains("display:none"))
                .unwrap_or(false)
        }
        None => false,
    }
}

#[inline]
pub fn hide_loading(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        _ = el.set_attribute("style", "display:none");
    }
}
