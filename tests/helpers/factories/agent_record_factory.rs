use crate::engine::types::{AgentId, AgentRecord, AgentStatus};

pub struct AgentRecordFactory {
    agent_id: AgentId,
    hostname: String,
    ip_address: String,
    collects_data: bool,
    status: AgentStatus,
}

impl AgentRecordFactory {
    pub fn new(n: u128) -> Self {
        Self {
            agent_id: AgentId::from_u128(n),
            hostname: format!("agent-{n}"),
            ip_address: format!("10.0.0.{}", n % 256),
            collects_data: true,
            status: AgentStatus::Healthy,
        }
    }

    pub fn collector(n: u128) -> Self {
        Self::new(n).with_collects_data(true)
    }

    pub fn aggregator(n: u128) -> Self {
        Self::new(n).with_collects_data(false)
    }

    pub fn with_hostname(mut self, hostname: &str) -> Self {
        self.hostname = hostname.to_string();
        self
    }

    pub fn with_ip_address(mut self, ip_address: &str) -> Self {
        self.ip_address = ip_address.to_string();
        self
    }

    pub fn with_collects_data(mut self, collects_data: bool) -> Self {
        self.collects_data = collects_data;
        self
    }

    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn create(self) -> AgentRecord {
        AgentRecord {
            agent_id: self.agent_id,
            hostname: self.hostname,
            ip_address: self.ip_address,
            collects_data: self.collects_data,
            status: self.status,
        }
    }
}
