//! Tasks a simulated user can perform and the requests they map to

use serde::{Serialize, Serializer};
use std::fmt;

use super::payload::OwnerPayload;

/// HTTP method used by a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to issue against the target service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the target base URL
    pub path: &'static str,
    /// JSON body, only for POST
    pub body: Option<OwnerPayload>,
}

impl RequestSpec {
    pub fn get(path: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
            body: None,
        }
    }

    pub fn post(path: &'static str, body: OwnerPayload) -> Self {
        Self {
            method: Method::Post,
            path,
            body: Some(body),
        }
    }

    /// Statistics key, e.g. `GET /owners/1`
    pub fn name(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// The six owner tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    ReadOwner,
    ReadAllOwners,
    CreateOwner2,
    ReadOwner2,
    CreateOwner3,
    ReadOwner3,
}

impl Task {
    pub const ALL: [Task; 6] = [
        Task::ReadOwner,
        Task::ReadAllOwners,
        Task::CreateOwner2,
        Task::ReadOwner2,
        Task::CreateOwner3,
        Task::ReadOwner3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Task::ReadOwner => "read_owner",
            Task::ReadAllOwners => "read_all_owners",
            Task::CreateOwner2 => "create_owner_2",
            Task::ReadOwner2 => "read_owner_2",
            Task::CreateOwner3 => "create_owner_3",
            Task::ReadOwner3 => "read_owner_3",
        }
    }

    /// The request this task issues. No response validation is attached:
    /// reads of owners 2 and 3 do not wait for the matching create.
    pub fn request(&self) -> RequestSpec {
        match self {
            Task::ReadOwner => RequestSpec::get("/owners/1"),
            Task::ReadAllOwners => RequestSpec::get("/owners"),
            Task::CreateOwner2 => RequestSpec::post("/owners", OwnerPayload::alice_smith()),
            Task::ReadOwner2 => RequestSpec::get("/owners/2"),
            Task::CreateOwner3 => RequestSpec::post("/owners", OwnerPayload::charlie_brown()),
            Task::ReadOwner3 => RequestSpec::get("/owners/3"),
        }
    }
}

impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_tasks_are_bodiless_gets() {
        let cases = [
            (Task::ReadOwner, "/owners/1"),
            (Task::ReadAllOwners, "/owners"),
            (Task::ReadOwner2, "/owners/2"),
            (Task::ReadOwner3, "/owners/3"),
        ];

        for (task, path) in cases {
            let req = task.request();
            assert_eq!(req.method, Method::Get, "{}", task);
            assert_eq!(req.path, path, "{}", task);
            assert!(req.body.is_none(), "{}", task);
        }
    }

    #[test]
    fn test_create_tasks_post_literal_payloads() {
        let alice = Task::CreateOwner2.request();
        assert_eq!(alice.method, Method::Post);
        assert_eq!(alice.path, "/owners");
        assert_eq!(alice.body, Some(OwnerPayload::alice_smith()));

        let charlie = Task::CreateOwner3.request();
        assert_eq!(charlie.method, Method::Post);
        assert_eq!(charlie.path, "/owners");
        assert_eq!(charlie.body, Some(OwnerPayload::charlie_brown()));
    }

    #[test]
    fn test_request_names() {
        assert_eq!(Task::ReadOwner.request().name(), "GET /owners/1");
        assert_eq!(Task::ReadAllOwners.request().name(), "GET /owners");
        assert_eq!(Task::CreateOwner2.request().name(), "POST /owners");
        assert_eq!(
            Task::CreateOwner2.request().name(),
            Task::CreateOwner3.request().name()
        );
    }

    #[test]
    fn test_task_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&Task::CreateOwner2).unwrap(),
            "\"create_owner_2\""
        );
    }

    #[test]
    fn test_task_names_are_unique() {
        let mut names: Vec<_> = Task::ALL.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Task::ALL.len());
    }
}
