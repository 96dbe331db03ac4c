use serde::{Deserialize, Serialize};

/// Teacher account without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i32,
    pub username: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub roll: String,
    pub email: String,
    pub dept: String,
    pub class_name: String,
    pub bluetooth_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: i32,
    pub code: String,
    pub title: String,
}

/// Roster row to insert when seeding.
#[derive(Debug, Clone)]
pub struct StudentInput {
    pub name: String,
    pub roll: String,
    pub email: String,
    pub dept: String,
    pub class_name: String,
    pub bluetooth_id: String,
}
