//! This module contains the implementations for the FTP commands defined in
//!
//! - [RFC 959 - FTP](https://tools.ietf.org/html/rfc959)
//! - [RFC 2389 - Feature negotiation mechanism for FTP](https://tools.ietf.org/html/rfc2389)
//! - [RFC 3659 - Extensions to FTP](https://tools.ietf.org/html/rfc3659)
//!
//! Every command is a plain struct implementing [`Command`] or [`FileTransferCommand`]. The
//! [`CommandRegistry`] wraps each one in the middleware its kind needs.

mod abor;
mod allo;
mod appe;
mod cdup;
mod cwd;
mod dele;
mod feat;
mod list;
mod mdtm;
mod mkd;
mod mode;
mod nlst;
mod noop;
mod opts;
mod pass;
mod pasv;
mod port;
mod pwd;
mod quit;
mod rein;
mod rest;
mod retr;
mod rmd;
mod rnfr;
mod rnto;
mod size;
mod stor;
mod stru;
mod syst;
mod type_;
mod user;

pub(crate) use abor::Abor;
pub(crate) use allo::Allo;
pub(crate) use appe::Appe;
pub(crate) use cdup::Cdup;
pub(crate) use cwd::Cwd;
pub(crate) use dele::Dele;
pub(crate) use feat::Feat;
pub(crate) use list::List;
pub(crate) use mdtm::Mdtm;
pub(crate) use mkd::Mkd;
pub(crate) use mode::Mode;
pub(crate) use nlst::Nlst;
pub(crate) use noop::Noop;
pub(crate) use opts::Opts;
pub(crate) use pass::Pass;
pub(crate) use pasv::Pasv;
pub(crate) use port::Port;
pub(crate) use pwd::Pwd;
pub(crate) use quit::Quit;
pub(crate) use rein::Rein;
pub(crate) use rest::Rest;
pub(crate) use retr::Retr;
pub(crate) use rmd::Rmd;
pub(crate) use rnfr::Rnfr;
pub(crate) use rnto::Rnto;
pub(crate) use size::Size;
pub(crate) use stor::Stor;
pub(crate) use stru::Stru;
pub(crate) use syst::Syst;
pub(crate) use type_::Type;
pub(crate) use user::User;

use crate::server::controlchan::{
    Reply, ReplyCode,
    handler::{Command, CommandHandler, FileTransferCommand},
    middleware::{ArgEncoding, DecodeArgs, RequireLogin, ResetVolatile, Retain, TakeRestartOffset},
};
use std::{collections::HashMap, sync::Arc};

// The reply for commands that need a non-empty argument and did not get one.
pub(super) fn missing_argument() -> Reply {
    Reply::new(ReplyCode::ParameterSyntaxError, "Syntax error in parameters or arguments")
}

pub(super) fn file_unavailable() -> Reply {
    Reply::new(ReplyCode::FileError, "File unavailable")
}

pub(super) fn file_action_okay() -> Reply {
    Reply::new(ReplyCode::FileActionOkay, "File action okay")
}

/// Maps command names to their fully wrapped handlers. Built once per server and shared by all
/// of its connections.
#[derive(Debug)]
pub(crate) struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub(crate) fn new() -> Self {
        let mut registry = CommandRegistry { handlers: HashMap::new() };

        registry.add(&["USER"], generic(User));
        registry.add(&["PASS"], generic(Pass));
        registry.add(&["REIN"], generic(Rein));
        registry.add(&["QUIT"], generic(Quit));

        registry.add(&["SYST"], authorized(Syst));
        registry.add(&["FEAT"], authorized(Feat));
        registry.add(&["OPTS"], authorized(Opts));
        registry.add(&["TYPE"], authorized(Type));
        registry.add(&["MODE"], authorized(Mode));
        registry.add(&["STRU"], authorized(Stru));
        registry.add(&["PASV"], authorized(Pasv));
        registry.add(&["PORT"], authorized(Port));
        registry.add(&["REST"], authorized(Rest));
        registry.add(&["CDUP", "XCUP"], authorized(Cdup));
        registry.add(&["ABOR"], authorized(Abor));
        registry.add(&["ALLO"], authorized(Allo));
        registry.add(&["NOOP"], authorized(Noop));

        registry.add(&["PWD", "XPWD"], path(Pwd));
        registry.add(&["CWD", "XCWD"], path(Cwd));
        registry.add(&["RNFR"], path(Rnfr));
        registry.add(&["RNTO"], path_retaining(Retain { rename_from: true, ..Retain::default() }, Rnto));
        registry.add(&["DELE"], path(Dele));
        registry.add(&["MKD", "XMKD"], path(Mkd));
        registry.add(&["RMD", "XRMD"], path(Rmd));
        registry.add(&["SIZE"], path(Size));
        registry.add(&["MDTM"], path(Mdtm));
        registry.add(&["LIST"], path(List));
        registry.add(&["NLST"], path(Nlst));

        registry.add(&["RETR"], file_transfer(Retr));
        registry.add(&["STOR"], file_transfer(Stor));
        registry.add(&["APPE"], file_transfer(Appe));

        registry
    }

    fn add(&mut self, names: &[&'static str], handler: Arc<dyn CommandHandler>) {
        for name in names {
            self.handlers.insert(*name, Arc::clone(&handler));
        }
    }

    /// Looks up a command by name, ignoring case.
    pub(crate) fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name.to_ascii_uppercase().as_str()).cloned()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        CommandRegistry::new()
    }
}

// Clears the volatile state and decodes arguments as control text. No login needed.
fn generic<C: Command + 'static>(command: C) -> Arc<dyn CommandHandler> {
    Arc::new(ResetVolatile::new(Retain::default(), DecodeArgs::new(ArgEncoding::Control, command)))
}

fn authorized<C: Command + 'static>(command: C) -> Arc<dyn CommandHandler> {
    Arc::new(RequireLogin::new(ResetVolatile::new(
        Retain::default(),
        DecodeArgs::new(ArgEncoding::Control, command),
    )))
}

fn path<C: Command + 'static>(command: C) -> Arc<dyn CommandHandler> {
    path_retaining(Retain::default(), command)
}

// Arguments are decoded with the session's path encoding.
fn path_retaining<C: Command + 'static>(retain: Retain, command: C) -> Arc<dyn CommandHandler> {
    Arc::new(RequireLogin::new(ResetVolatile::new(retain, DecodeArgs::new(ArgEncoding::Path, command))))
}

fn file_transfer<C: FileTransferCommand + 'static>(command: C) -> Arc<dyn CommandHandler> {
    path_retaining(
        Retain {
            restart_offset: true,
            ..Retain::default()
        },
        TakeRestartOffset::new(command),
    )
}
