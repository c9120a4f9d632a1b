use foundation::DataviewId;
use serde::Serialize;

/// Why a dataview received a new url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTrigger {
    /// Entity whose change caused the map to be re-instantiated, if known.
    pub source_id: Option<String>,
    pub force_fetch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataviewEntity {
    id: DataviewId,
    url: Option<String>,
    last_refresh: Option<RefreshTrigger>,
    fetch_requested: bool,
}

impl DataviewEntity {
    pub fn new(id: impl Into<DataviewId>) -> Self {
        Self {
            id: id.into(),
            url: None,
            last_refresh: None,
            fetch_requested: false,
        }
    }

    pub fn id(&self) -> &DataviewId {
        &self.id
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn last_refresh(&self) -> Option<&RefreshTrigger> {
        self.last_refresh.as_ref()
    }

    /// Applies a url together with the trigger that produced it.
    ///
    /// A fetch is requested when the url changed or the trigger forces one.
    /// The request stays raised until [`take_fetch_request`](Self::take_fetch_request).
    pub fn set_url(&mut self, url: impl Into<String>, trigger: RefreshTrigger) -> bool {
        let url = url.into();
        let fetch = trigger.force_fetch || self.url.as_deref() != Some(url.as_str());
        self.url = Some(url);
        self.last_refresh = Some(trigger);
        self.fetch_requested |= fetch;
        fetch
    }

    pub fn fetch_requested(&self) -> bool {
        self.fetch_requested
    }

    pub fn take_fetch_request(&mut self) -> bool {
        std::mem::take(&mut self.fetch_requested)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataviewCollectionError {
    DuplicateId(DataviewId),
}

impl std::fmt::Display for DataviewCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataviewCollectionError::DuplicateId(id) => write!(f, "duplicate dataview id: {id}"),
        }
    }
}

impl std::error::Error for DataviewCollectionError {}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DataviewCollection {
    dataviews: Vec<DataviewEntity>,
}

impl DataviewCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, dataview: DataviewEntity) -> Result<(), DataviewCollectionError> {
        if self.get(dataview.id()).is_some() {
            return Err(DataviewCollectionError::DuplicateId(dataview.id().clone()));
        }
        self.dataviews.push(dataview);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.dataviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataviews.is_empty()
    }

    pub fn get(&self, id: &DataviewId) -> Option<&DataviewEntity> {
        self.dataviews.iter().find(|d| d.id() == id)
    }

    pub fn get_mut(&mut self, id: &DataviewId) -> Option<&mut DataviewEntity> {
        self.dataviews.iter_mut().find(|d| d.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataviewEntity> {
        self.dataviews.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DataviewEntity> {
        self.dataviews.iter_mut()
    }
}
