//! 患者記録ビューア（タブ付きモーダル）
//!
//! 開くと全タブを同時に取得し、届いたタブから順に表示する。

use crate::api::WebGateway;
use crate::app::use_app_state;
use crate::components::loading::LoadingOverlay;
use crate::components::profile_tab::ProfileTab;
use crate::components::record_lists::RecordList;
use leptos::prelude::*;
use leptos::task::spawn_local;
use patient_records_common::{PatientApi, RecordTab, RecordTickets, RecordViewer};
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit, File};

/// 登録モーダルはホストページ側にある。このイベントで開いてもらう
pub const REGISTER_EVENT: &str = "register-record";

/// `web_sys::File` が `Send` でないのでローカル保存のシグナルにする
pub type ViewerSignal = RwSignal<RecordViewer<File>, LocalStorage>;

fn load_records(api: WebGateway, viewer: ViewerSignal, id: String, tickets: RecordTickets) {
    spawn_local(async move {
        let api = &api;
        let id = id.as_str();
        futures::join!(
            async {
                let result = api.get_profile(id).await;
                viewer.update(|v| {
                    v.resolve_profile(tickets.profile, result);
                });
            },
            async {
                let result = api.list_files(id).await;
                viewer.update(|v| {
                    v.resolve_files(tickets.files, result);
                });
            },
            async {
                let result = api.list_exams(id).await;
                viewer.update(|v| {
                    v.resolve_exams(tickets.exams, result);
                });
            },
            async {
                let result = api.list_hospitalizations(id).await;
                viewer.update(|v| {
                    v.resolve_hospitalizations(tickets.hospitalizations, result);
                });
            },
            async {
                let result = api.list_reports(id).await;
                viewer.update(|v| {
                    v.resolve_reports(tickets.reports, result);
                });
            }
        );
    });
}

/// イベントの detail（JSON文字列）
fn register_detail(patient_id: &str, tab: RecordTab) -> String {
    serde_json::json!({ "patientId": patient_id, "kind": tab.as_str() }).to_string()
}

fn request_registration(patient_id: &str, tab: RecordTab) {
    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(&register_detail(patient_id, tab)));
    let event = match CustomEvent::new_with_event_init_dict(REGISTER_EVENT, &init) {
        Ok(event) => event,
        Err(e) => {
            gloo::console::error!(e);
            return;
        }
    };
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.dispatch_event(&event) {
            gloo::console::error!(e);
        }
    }
}

#[component]
pub fn RecordModal() -> impl IntoView {
    let state = use_app_state();
    let viewer: ViewerSignal = RwSignal::new_local(RecordViewer::new(""));

    Effect::new(move |_| match state.selected.get() {
        Some(id) => {
            if let Some(tickets) = viewer.try_update(|v| v.open_patient(id.clone())) {
                load_records(state.api.get_value(), viewer, id, tickets);
            }
        }
        None => viewer.update(|v| v.close()),
    });

    let active = Memo::new(move |_| viewer.with(|v| v.active_tab()));
    let close = move |_| state.selected.set(None);
    let on_register = move |tab: RecordTab| {
        let patient_id = viewer.with_untracked(|v| v.patient_id().to_string());
        request_registration(&patient_id, tab);
    };
    let title = move || {
        viewer.with(|v| {
            let name = &v.editor().form().name;
            if name.is_empty() {
                "患者記録".to_string()
            } else {
                name.clone()
            }
        })
    };

    view! {
        <Show when=move || state.selected.with(Option::is_some)>
            <div class="modal-backdrop" on:click=close />
            <div class="modal record-modal" role="dialog">
                <div class="modal-header">
                    <h2>{title}</h2>
                    <button class="modal-close" on:click=close>"×"</button>
                </div>
                <nav class="tabs">
                    {RecordTab::ALL
                        .into_iter()
                        .map(|tab| {
                            view! {
                                <button
                                    class=move || if active.get() == tab { "tab active" } else { "tab" }
                                    on:click=move |_| viewer.update(|v| v.select_tab(tab))
                                >
                                    {tab.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </nav>
                <div class="modal-body">
                    <LoadingOverlay when=move || viewer.with(|v| v.is_tab_loading(active.get())) />
                    {move || match active.get() {
                        RecordTab::Profile => view! { <ProfileTab viewer=viewer /> }.into_any(),
                        tab => view! { <RecordList viewer=viewer tab=tab on_register=on_register /> }.into_any(),
                    }}
                </div>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_detail_names_patient_and_kind() {
        let detail: serde_json::Value =
            serde_json::from_str(&register_detail("p1", RecordTab::Exams)).unwrap();
        assert_eq!(detail["patientId"], "p1");
        assert_eq!(detail["kind"], "exams");
    }
}
