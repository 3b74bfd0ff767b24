//! フィードの患者カード

use leptos::prelude::*;
use patient_records_common::PatientSummary;

#[component]
pub fn PatientCard<F>(patient: PatientSummary, on_open: F) -> impl IntoView
where
    F: Fn(String) + Clone + Send + Sync + 'static,
{
    let id = patient.id.clone();
    let exams = patient.exam_labels();
    let diagnosis: Vec<String> = patient.diagnosis.iter().map(|d| d.label.clone()).collect();
    let prognosis = (!patient.prognosis.is_empty()).then(|| format!("予後: {}", patient.prognosis));
    let details = [
        ("種", patient.specie.clone()),
        ("品種", patient.race.clone()),
        ("性別", patient.gender.clone()),
        ("体重", patient.weight.clone()),
        ("体格", patient.physical_shape.clone()),
    ];

    view! {
        <article class="patient-card" on:click=move |_| on_open(id.clone())>
            <div class="card-photo">
                {match patient.profile_photo.clone() {
                    Some(src) => view! { <img src=src alt=patient.name.clone() /> }.into_any(),
                    None => view! { <div class="photo-placeholder">"🐾"</div> }.into_any(),
                }}
            </div>
            <div class="card-body">
                <h3 class="card-title">{patient.name.clone()}</h3>
                <dl class="card-details">
                    {details
                        .into_iter()
                        .filter(|(_, value)| !value.is_empty())
                        .map(|(label, value)| view! { <dt>{label}</dt><dd>{value}</dd> })
                        .collect_view()}
                </dl>
                {prognosis.map(|p| view! { <p class="card-prognosis">{p}</p> })}
                <div class="tags">
                    {diagnosis
                        .into_iter()
                        .map(|label| view! { <span class="tag">{label}</span> })
                        .collect_view()}
                </div>
                <div class="tags exams">
                    {exams
                        .iter()
                        .map(|label| view! { <span class="tag exam">{*label}</span> })
                        .collect_view()}
                </div>
            </div>
        </article>
    }
}
