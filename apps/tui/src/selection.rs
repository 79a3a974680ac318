use crate::domain::PrecinctProperties;

/// The precinct whose details popup is open.
///
/// Only a map click or an explicit close changes it. A refetch that drops the
/// selected precinct leaves the popup showing until the user closes it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection {
    current: Option<PrecinctProperties>,
}

impl Selection {
    pub fn select(&mut self, properties: PrecinctProperties) {
        tracing::debug!(precinct_id = %properties.precinct_id, "Selected precinct");
        self.current = Some(properties);
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub const fn current(&self) -> Option<&PrecinctProperties> {
        self.current.as_ref()
    }

    pub const fn is_open(&self) -> bool {
        self.current.is_some()
    }
}
