use dataviews::{DataviewCollection, RefreshTrigger};
use foundation::Protocol;
use mapservice::MapInstantiationResult;
use runtime::{EntityKind, EventBus, Transition};
use tracing::debug;

/// Applies protocol-resolved urls to every dataview the result knows about.
///
/// Dataviews absent from the result belong to another instantiation batch and
/// are left untouched. Returns the number of dataviews updated.
pub fn update_dataviews(
    dataviews: &mut DataviewCollection,
    result: &MapInstantiationResult,
    protocol: Protocol,
    source_id: Option<&str>,
    force_fetch: bool,
    bus: &mut EventBus,
) -> usize {
    let mut updated = 0;
    for dataview in dataviews.iter_mut() {
        let Some(url) = result.dataview_url(dataview.id(), protocol) else {
            continue;
        };

        let trigger = RefreshTrigger {
            source_id: source_id.map(str::to_string),
            force_fetch,
        };
        let fetch = dataview.set_url(url, trigger);
        debug!(dataview = %dataview.id(), fetch, "dataview url applied");
        bus.emit(EntityKind::Dataview, dataview.id().as_str(), Transition::Refreshed);
        updated += 1;
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::update_dataviews;
    use dataviews::{DataviewCollection, DataviewEntity, RefreshTrigger};
    use foundation::{DataviewId, Protocol};
    use mapservice::MapInstantiationResult;
    use runtime::EventBus;

    fn result() -> MapInstantiationResult {
        MapInstantiationResult::from_json(
            r#"{
                "dataviews": {
                    "dv1": {"url": {"http": "http://x.example.com/dv1", "https": "https://x.example.com/dv1"}}
                }
            }"#,
        )
        .unwrap()
    }

    fn dataviews() -> DataviewCollection {
        let mut dataviews = DataviewCollection::new();
        dataviews.add(DataviewEntity::new("dv1")).unwrap();
        dataviews.add(DataviewEntity::new("dv2")).unwrap();
        dataviews
    }

    #[test]
    fn applies_url_and_tags_refresh() {
        let mut dataviews = dataviews();
        let mut bus = EventBus::new();
        let updated = update_dataviews(
            &mut dataviews,
            &result(),
            Protocol::Https,
            Some("layer2"),
            true,
            &mut bus,
        );
        assert_eq!(updated, 1);

        let dv1 = dataviews.get(&DataviewId::from("dv1")).unwrap();
        assert_eq!(dv1.url(), Some("https://x.example.com/dv1"));
        assert_eq!(
            dv1.last_refresh(),
            Some(&RefreshTrigger {
                source_id: Some("layer2".into()),
                force_fetch: true,
            })
        );
        assert!(dv1.fetch_requested());

        let dv2 = dataviews.get(&DataviewId::from("dv2")).unwrap();
        assert_eq!(dv2, &DataviewEntity::new("dv2"));
        assert_eq!(bus.events().len(), 1);
    }

    #[test]
    fn resolves_http_variant() {
        let mut dataviews = dataviews();
        let mut bus = EventBus::new();
        update_dataviews(&mut dataviews, &result(), Protocol::Http, None, false, &mut bus);
        let dv1 = dataviews.get(&DataviewId::from("dv1")).unwrap();
        assert_eq!(dv1.url(), Some("http://x.example.com/dv1"));
        assert_eq!(dv1.last_refresh().unwrap().source_id, None);
    }
}
