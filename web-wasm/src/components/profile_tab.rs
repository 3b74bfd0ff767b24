//! プロフィール編集タブ

use crate::app::{notify_search_invalidated, use_app_state};
use crate::components::loading::ErrorBanner;
use crate::components::record_modal::ViewerSignal;
use crate::query::use_query_client;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use patient_records_common::{submit_profile, DiagnosisKey, ProfileField, SubmitState};
use web_sys::{HtmlInputElement, Url};

fn set_field(viewer: ViewerSignal, field: ProfileField, value: &str) {
    let result = viewer.try_update(|v| v.editor_mut().form_mut().set(field, value));
    if let Some(Err(e)) = result {
        gloo::console::warn!(e.to_string());
    }
}

/// `<input type="date">` に入る形へ切り詰める
fn date_value(raw: &str) -> String {
    raw.get(..10).unwrap_or(raw).to_string()
}

fn field_error(viewer: ViewerSignal, field: ProfileField) -> impl IntoView {
    move || {
        viewer
            .with(|v| v.editor().visible_error(field).map(str::to_string))
            .map(|message| view! { <span class="field-error">{message}</span> })
    }
}

fn text_input(
    viewer: ViewerSignal,
    field: ProfileField,
    input_type: &'static str,
) -> impl IntoView {
    let value = move || {
        viewer.with(|v| {
            let value = v.editor().form().value(field);
            if input_type == "date" {
                date_value(value)
            } else {
                value.to_string()
            }
        })
    };
    view! {
        <label class="form-field">
            <span class="form-label">{field.label()}</span>
            <input
                type=input_type
                prop:value=value
                disabled=move || viewer.with(|v| v.editor().form().is_overridden(field))
                on:input=move |ev| set_field(viewer, field, &event_target_value(&ev))
            />
            {field_error(viewer, field)}
        </label>
    }
}

fn select_input(viewer: ViewerSignal, field: ProfileField) -> impl IntoView {
    let options = field.options().unwrap_or(&[]);
    view! {
        <label class="form-field">
            <span class="form-label">{field.label()}</span>
            <select on:change=move |ev| set_field(viewer, field, &event_target_value(&ev))>
                <option value="">"選択してください"</option>
                {options
                    .iter()
                    .copied()
                    .map(|option| {
                        view! {
                            <option
                                value=option
                                selected=move || viewer.with(|v| v.editor().form().value(field) == option)
                            >
                                {option}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </label>
    }
}

fn override_checkbox(
    viewer: ViewerSignal,
    field: ProfileField,
    label: &'static str,
) -> impl IntoView {
    view! {
        <label class="checkbox">
            <input
                type="checkbox"
                prop:checked=move || viewer.with(|v| v.editor().form().is_overridden(field))
                on:change=move |ev| {
                    let on = event_target_checked(&ev);
                    viewer.update(|v| v.editor_mut().form_mut().set_overridden(field, on));
                }
            />
            {label}
        </label>
    }
}

#[component]
pub fn ProfileTab(viewer: ViewerSignal) -> impl IntoView {
    let state = use_app_state();
    let query = use_query_client();

    let on_photo = move |ev: ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        match Url::create_object_url_with_blob(&file) {
            Ok(preview) => viewer.update(|v| v.editor_mut().select_image(file, preview)),
            Err(e) => gloo::console::error!(e),
        }
    };

    let on_diagnosis_key = move |ev: ev::KeyboardEvent| {
        let key = DiagnosisKey::from_key(&ev.key());
        let added = viewer
            .try_update(|v| v.editor_mut().handle_diagnosis_key(key))
            .unwrap_or(false);
        if added {
            ev.prevent_default();
        }
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(Ok(job)) = viewer.try_update(|v| v.editor_mut().begin_submit()) else {
            return;
        };
        let api = state.api.get_value();
        let query = query.clone();
        let ticket = job.ticket;
        spawn_local(async move {
            let result = submit_profile(&api, &query.cache, job).await;
            let saved = result.is_ok();
            // 保存中に閉じた・別の患者へ移ったときは表示に反映しない
            let applied = viewer
                .try_update(|v| v.editor_mut().finish_submit(ticket, &result))
                .unwrap_or(false);
            if !applied {
                gloo::console::debug!("stale submit result discarded");
            }
            if saved {
                notify_search_invalidated(&query);
            }
        });
    };

    let diagnosis_tags = move || {
        viewer
            .with(|v| {
                v.editor()
                    .form()
                    .diagnosis
                    .iter()
                    .map(|d| d.label.clone())
                    .collect::<Vec<_>>()
            })
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                view! {
                    <span class="tag">
                        {label}
                        <button
                            type="button"
                            class="tag-remove"
                            on:click=move |_| viewer.update(|v| v.editor_mut().remove_diagnosis(index))
                        >
                            "×"
                        </button>
                    </span>
                }
            })
            .collect_view()
    };

    let status = move || {
        viewer
            .with(|v| match v.editor().submit_state() {
                SubmitState::Saved => Some(("form-status ok", "保存しました".to_string())),
                SubmitState::Failed(message) => Some(("form-status error", message.clone())),
                SubmitState::Idle | SubmitState::Saving => None,
            })
            .map(|(class, text)| view! { <p class=class>{text}</p> })
    };

    view! {
        {move || {
            viewer
                .with(|v| v.editor().load_error().map(str::to_string))
                .map(|message| view! { <ErrorBanner message=message /> })
        }}
        <form class="profile-form" on:submit=on_submit>
            <div class="profile-photo">
                {move || match viewer.with(|v| v.editor().photo().map(str::to_string)) {
                    Some(src) => view! { <img src=src alt="プロフィール写真" /> }.into_any(),
                    None => view! { <div class="photo-placeholder">"🐾"</div> }.into_any(),
                }}
                <label class="btn btn-secondary">
                    "写真を選択"
                    <input type="file" accept=".jpg, .jpeg, .png" style="display: none" on:change=on_photo />
                </label>
            </div>

            {text_input(viewer, ProfileField::Name, "text")}
            {text_input(viewer, ProfileField::Specie, "text")}
            {override_checkbox(viewer, ProfileField::Specie, "種不明")}
            {text_input(viewer, ProfileField::Race, "text")}
            {override_checkbox(viewer, ProfileField::Race, "品種不明")}
            {text_input(viewer, ProfileField::Owner, "text")}
            {override_checkbox(viewer, ProfileField::Owner, "飼い主なし")}
            {select_input(viewer, ProfileField::Gender)}
            {text_input(viewer, ProfileField::Weight, "text")}
            {select_input(viewer, ProfileField::PhysicalShape)}
            {select_input(viewer, ProfileField::Prognosis)}
            {text_input(viewer, ProfileField::EntryDate, "date")}
            {text_input(viewer, ProfileField::DepartureDate, "date")}

            <div class="form-field">
                <span class="form-label">"診断"</span>
                <div class="tags">{diagnosis_tags}</div>
                <input
                    type="text"
                    placeholder="診断名を入力して Enter"
                    prop:value=move || viewer.with(|v| v.editor().diagnosis_input().to_string())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        viewer.update(|v| v.editor_mut().set_diagnosis_input(value));
                    }
                    on:keydown=on_diagnosis_key
                />
            </div>

            {status}
            <button
                type="submit"
                class="btn btn-primary"
                disabled=move || viewer.with(|v| v.editor().is_busy())
            >
                "保存"
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_value() {
        assert_eq!(date_value("2024-03-05T10:20:00.000Z"), "2024-03-05");
        assert_eq!(date_value("2024-03-05"), "2024-03-05");
        assert_eq!(date_value(""), "");
    }
}
