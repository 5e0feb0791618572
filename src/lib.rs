//! # Policy Grounding
//!
//! Grounds free-text questions in a small, static corpus of policy and
//! reference documents. Documents are embedded once, on first use, and each
//! question is answered with the top-k most similar snippets and their
//! cosine scores, ready to be cited as `[1]`, `[2]`, … in a prompt.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ ./knowledge  │──▶│  KnowledgeStore  │◀──│  Embedding   │
//! │   *.md       │   │ (lazy, once-only)│   │ OpenAI/Ollama│
//! └──────────────┘   └────────┬─────────┘   └──────────────┘
//!                             ▼
//!                    retrieve(query, k) ──▶ grounding block
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ground sources                          # list the corpus
//! ground search "What age must I be?"     # ranked snippets
//! ground context "What age must I be?"    # prompt-ready notes block
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`corpus_fs`] | Filesystem corpus loader |
//! | [`embedding`] | OpenAI and Ollama embedding providers |
//! | [`search`] | Store wiring and `ground search` |
//! | [`grounding`] | Notes block and citations |
//! | [`sources`] | `ground sources` |

pub mod config;
pub mod corpus_fs;
pub mod embedding;
pub mod grounding;
pub mod search;
pub mod sources;
