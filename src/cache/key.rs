use std::fmt;

use crate::api::{ApiRequest, Resource};

/// Cache identity: resource name plus ordered parameters.
///
/// Parameter order is significant; `page=1&per_page=20` and `per_page=20&page=1` are
/// different keys. [`ApiRequest`] constructors always emit the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    pub params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(resource: Resource, params: Vec<(String, String)>) -> Self {
        Self { resource, params }
    }
}

impl From<&ApiRequest> for QueryKey {
    fn from(request: &ApiRequest) -> Self {
        let mut params = Vec::with_capacity(request.params.len() + 1);
        if let Some(id) = &request.id {
            params.push(("id".to_string(), id.clone()));
        }
        params.extend(request.params.iter().cloned());
        Self::new(request.resource, params)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        Ok(())
    }
}
