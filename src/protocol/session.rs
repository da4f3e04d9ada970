//! 会话角色、状态机与响应方私密状态
//!
//! 状态只能前进：
//! - 响应方：`Uninitialized → KeysGenerated → Decapsulated → KeyDerived`
//! - 发起方：`Uninitialized → Encapsulated → KeyDerived`
//!
//! 任一步骤失败进入 `Aborted`。`KeyDerived` 与 `Aborted` 都是终态，会话不可复用，
//! 重试必须开启新会话并使用新密钥。

use super::HybridProtocol;
use super::bundle::{CiphertextBundle, PublicBundle};
use crate::asymmetric::keys::{PrivateComponent, SHARED_SECRET_LEN, SharedSecret};
use crate::asymmetric::traits::KeyEncapsulationMechanism;
use crate::combiner::HybridKey;
use crate::common::errors::{Error, Result};
use hmac::{Hmac, Mac};
use log::trace;
use rand_core::{OsRng, TryRngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// 协议中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Initiator,
    Responder,
}

impl Role {
    pub(crate) fn as_byte(self) -> u8 {
        match self {
            Role::Initiator => 0x01,
            Role::Responder => 0x02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Uninitialized,
    KeysGenerated,
    Encapsulated,
    Decapsulated,
    KeyDerived,
    Aborted,
}

impl SessionState {
    /// 判断某角色是否允许从当前状态进入 `next`
    pub fn can_transition_to(self, next: SessionState, role: Role) -> bool {
        use SessionState::*;
        match (role, self, next) {
            (_, KeyDerived | Aborted, _) => false,
            (_, _, Aborted) => true,
            (Role::Responder, Uninitialized, KeysGenerated)
            | (Role::Responder, KeysGenerated, Decapsulated)
            | (Role::Responder, Decapsulated, KeyDerived)
            | (Role::Initiator, Uninitialized, Encapsulated)
            | (Role::Initiator, Encapsulated, KeyDerived) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::KeyDerived | SessionState::Aborted)
    }
}

fn ensure_transition(role: Role, state: SessionState, next: SessionState) -> Result<()> {
    if state.can_transition_to(next, role) {
        Ok(())
    } else {
        Err(Error::InvalidState(format!(
            "{:?} cannot move from {:?} to {:?}",
            role, state, next
        )))
    }
}

fn transition(role: Role, state: &mut SessionState, next: SessionState) -> Result<()> {
    ensure_transition(role, *state, next)?;
    trace!("{:?} session: {:?} -> {:?}", role, state, next);
    *state = next;
    Ok(())
}

/// 响应方在两次交互之间保留的私密状态
///
/// 包含两个私钥组件与一个会话级的随机拒绝种子。不可克隆，
/// 只能被 `responder_decapsulate` 按值消费一次；无论在哪条路径上被丢弃都会清零。
pub struct ResponderSecrets {
    pub(super) classical: PrivateComponent,
    pub(super) post_quantum: PrivateComponent,
    rejection_seed: Zeroizing<[u8; 32]>,
}

impl ResponderSecrets {
    pub(super) fn new(
        classical: PrivateComponent,
        post_quantum: PrivateComponent,
    ) -> Result<Self> {
        let mut rejection_seed = Zeroizing::new([0u8; 32]);
        OsRng
            .try_fill_bytes(&mut rejection_seed[..])
            .map_err(|e| Error::KeyGen(format!("生成拒绝种子失败: {}", e)))?;
        Ok(Self {
            classical,
            post_quantum,
            rejection_seed,
        })
    }

    /// 解封装失败时使用的替代密钥：HMAC(种子, 方案名 ‖ 0x00 ‖ 密文)
    ///
    /// 对同一会话、同一密文是确定的，与真实共享密钥无关。
    pub(super) fn rejection_secret(
        &self,
        scheme: &str,
        ciphertext: &[u8],
    ) -> Result<SharedSecret> {
        let mut mac = HmacSha256::new_from_slice(&self.rejection_seed[..])
            .map_err(|e| Error::KeyDerivation(format!("初始化HMAC失败: {}", e)))?;
        mac.update(scheme.as_bytes());
        mac.update(&[0x00]);
        mac.update(ciphertext);

        let mut out = [0u8; SHARED_SECRET_LEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(SharedSecret::new(out))
    }
}

impl std::fmt::Debug for ResponderSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResponderSecrets([REDACTED])")
    }
}

/// 带状态检查的单次响应方会话
pub struct ResponderSession<'p, C, P> {
    protocol: &'p HybridProtocol<C, P>,
    state: SessionState,
    secrets: Option<ResponderSecrets>,
}

impl<'p, C, P> ResponderSession<'p, C, P>
where
    C: KeyEncapsulationMechanism,
    P: KeyEncapsulationMechanism,
{
    pub fn new(protocol: &'p HybridProtocol<C, P>) -> Self {
        Self {
            protocol,
            state: SessionState::Uninitialized,
            secrets: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn abort(&mut self) {
        self.secrets = None;
        if !self.state.is_terminal() {
            trace!("Responder session: {:?} -> Aborted", self.state);
            self.state = SessionState::Aborted;
        }
    }

    /// 生成两对密钥，返回需要发送给发起方的公钥包
    pub fn generate_keys(&mut self) -> Result<PublicBundle> {
        ensure_transition(Role::Responder, self.state, SessionState::KeysGenerated)?;
        match self.protocol.init_responder() {
            Ok((public, secrets)) => {
                self.secrets = Some(secrets);
                transition(Role::Responder, &mut self.state, SessionState::KeysGenerated)?;
                Ok(public)
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }

    /// 处理发起方的密文包并得到混合密钥；私钥材料随即被销毁
    pub fn derive_key(&mut self, ciphertexts: &CiphertextBundle) -> Result<HybridKey> {
        ensure_transition(Role::Responder, self.state, SessionState::Decapsulated)?;
        let secrets = self
            .secrets
            .take()
            .ok_or_else(|| Error::InvalidState("responder secrets already consumed".to_string()))?;

        match self.protocol.responder_decapsulate(secrets, ciphertexts) {
            Ok(key) => {
                transition(Role::Responder, &mut self.state, SessionState::Decapsulated)?;
                transition(Role::Responder, &mut self.state, SessionState::KeyDerived)?;
                Ok(key)
            }
            Err(e) => {
                self.abort();
                Err(e)
            }
        }
    }
}

/// 带状态检查的单次发起方会话
pub struct InitiatorSession<'p, C, P> {
    protocol: &'p HybridProtocol<C, P>,
    state: SessionState,
    key: Option<HybridKey>,
}

impl<'p, C, P> InitiatorSession<'p, C, P>
where
    C: KeyEncapsulationMechanism,
    P: KeyEncapsulationMechanism,
{
    pub fn new(protocol: &'p HybridProtocol<C, P>) -> Self {
        Self {
            protocol,
            state: SessionState::Uninitialized,
            key: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 针对响应方的公钥包封装，返回需要发回的密文包
    pub fn encapsulate(&mut self, public: &PublicBundle) -> Result<CiphertextBundle> {
        ensure_transition(Role::Initiator, self.state, SessionState::Encapsulated)?;
        match self.protocol.initiator_encapsulate(public) {
            Ok((ciphertexts, key)) => {
                self.key = Some(key);
                transition(Role::Initiator, &mut self.state, SessionState::Encapsulated)?;
                Ok(ciphertexts)
            }
            Err(e) => {
                trace!("Initiator session: {:?} -> Aborted", self.state);
                self.state = SessionState::Aborted;
                Err(e)
            }
        }
    }

    /// 取出混合密钥，会话随之结束
    pub fn take_key(&mut self) -> Result<HybridKey> {
        ensure_transition(Role::Initiator, self.state, SessionState::KeyDerived)?;
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::InvalidState("initiator key already taken".to_string()))?;
        transition(Role::Initiator, &mut self.state, SessionState::KeyDerived)?;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::CryptoConfig;
    use crate::protocol::mock::{FailingKeyGenKem, XorKem};

    fn setup_protocol() -> HybridProtocol<XorKem, XorKem> {
        HybridProtocol::new(CryptoConfig::default()).unwrap()
    }

    #[test]
    fn test_responder_transitions() {
        use SessionState::*;
        let role = Role::Responder;
        assert!(Uninitialized.can_transition_to(KeysGenerated, role));
        assert!(KeysGenerated.can_transition_to(Decapsulated, role));
        assert!(Decapsulated.can_transition_to(KeyDerived, role));

        assert!(!Uninitialized.can_transition_to(Encapsulated, role));
        assert!(!KeysGenerated.can_transition_to(Uninitialized, role));
        assert!(!Decapsulated.can_transition_to(KeysGenerated, role));
        assert!(!KeyDerived.can_transition_to(Aborted, role));
    }

    #[test]
    fn test_initiator_transitions() {
        use SessionState::*;
        let role = Role::Initiator;
        assert!(Uninitialized.can_transition_to(Encapsulated, role));
        assert!(Encapsulated.can_transition_to(KeyDerived, role));

        assert!(!Uninitialized.can_transition_to(KeysGenerated, role));
        assert!(!Encapsulated.can_transition_to(Decapsulated, role));
        assert!(!Uninitialized.can_transition_to(KeyDerived, role));
        assert!(Encapsulated.can_transition_to(Aborted, role));
        assert!(!Aborted.can_transition_to(Uninitialized, role));
    }

    #[test]
    fn test_session_objects_walk_the_state_machine() {
        let protocol = setup_protocol();
        let mut responder = ResponderSession::new(&protocol);
        let mut initiator = InitiatorSession::new(&protocol);

        let public = responder.generate_keys().unwrap();
        assert_eq!(responder.state(), SessionState::KeysGenerated);

        let ciphertexts = initiator.encapsulate(&public).unwrap();
        assert_eq!(initiator.state(), SessionState::Encapsulated);

        let responder_key = responder.derive_key(&ciphertexts).unwrap();
        let initiator_key = initiator.take_key().unwrap();
        assert_eq!(responder.state(), SessionState::KeyDerived);
        assert_eq!(initiator.state(), SessionState::KeyDerived);
        assert_eq!(responder_key, initiator_key);
    }

    #[test]
    fn test_sessions_are_single_use() {
        let protocol = setup_protocol();
        let mut responder = ResponderSession::new(&protocol);
        let mut initiator = InitiatorSession::new(&protocol);

        let public = responder.generate_keys().unwrap();
        assert!(matches!(responder.generate_keys(), Err(Error::InvalidState(_))));

        let ciphertexts = initiator.encapsulate(&public).unwrap();
        assert!(matches!(initiator.encapsulate(&public), Err(Error::InvalidState(_))));

        responder.derive_key(&ciphertexts).unwrap();
        assert!(matches!(
            responder.derive_key(&ciphertexts),
            Err(Error::InvalidState(_))
        ));

        initiator.take_key().unwrap();
        assert!(matches!(initiator.take_key(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_out_of_order_calls_are_rejected() {
        let protocol = setup_protocol();
        let mut responder = ResponderSession::new(&protocol);
        let bundle = CiphertextBundle {
            classical: vec![0; 32],
            post_quantum: vec![0; 32],
        };
        assert!(matches!(responder.derive_key(&bundle), Err(Error::InvalidState(_))));
        assert_eq!(responder.state(), SessionState::Uninitialized);

        let mut initiator = InitiatorSession::new(&protocol);
        assert!(matches!(initiator.take_key(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_failed_keygen_aborts_session() {
        let protocol = HybridProtocol::<XorKem, FailingKeyGenKem>::new(CryptoConfig::default())
            .unwrap();
        let mut responder = ResponderSession::new(&protocol);
        assert!(matches!(responder.generate_keys(), Err(Error::KeyGen(_))));
        assert_eq!(responder.state(), SessionState::Aborted);
        assert!(matches!(responder.generate_keys(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_failed_encapsulation_aborts_initiator() {
        let protocol = setup_protocol();
        let mut initiator = InitiatorSession::new(&protocol);
        let bogus = PublicBundle {
            classical: vec![1, 2, 3].into(),
            post_quantum: vec![4, 5, 6].into(),
        };
        assert!(matches!(initiator.encapsulate(&bogus), Err(Error::Encapsulation(_))));
        assert_eq!(initiator.state(), SessionState::Aborted);
    }

    #[test]
    fn test_rejection_secret_is_deterministic_and_scheme_bound() {
        let secrets = ResponderSecrets::new(vec![1; 32].into(), vec![2; 32].into()).unwrap();
        let a = secrets.rejection_secret("A", b"ciphertext").unwrap();
        let again = secrets.rejection_secret("A", b"ciphertext").unwrap();
        let b = secrets.rejection_secret("B", b"ciphertext").unwrap();
        assert_eq!(a.as_bytes(), again.as_bytes());
        assert_ne!(a.as_bytes(), b.as_bytes());

        // 不同会话的种子不同
        let other = ResponderSecrets::new(vec![1; 32].into(), vec![2; 32].into()).unwrap();
        let c = other.rejection_secret("A", b"ciphertext").unwrap();
        assert_ne!(a.as_bytes(), c.as_bytes());

        assert_eq!(format!("{:?}", secrets), "ResponderSecrets([REDACTED])");
    }
}
