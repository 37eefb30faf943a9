#![allow(dead_code)]

use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn template(name: &str) -> PathBuf {
    fixture("templates").join(name)
}

pub const PYTHON_USER_SERVICE: &str = "from dataclasses import dataclass


@dataclass
class GetUserRequest:
    id: int


@dataclass
class User:
    email: str
    id: int
    tags: list[str]
";

pub const GO_CLIENT_USER_SERVICE: &str = "package users

type UserServiceClient interface {
\tGetUser(req *GetUserRequest) (*User, error)
\tWatchUsers(req *GetUserRequest) (<-chan *User, error)
}
";
