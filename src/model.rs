//! Azure stateful node request documents
//!
//! Every struct below is a document type the transformer can instantiate by
//! name. Field names are the snake_case keys users write; serialization
//! produces the camelCase wire form the API expects.

use declarative::TypeRegistry;

declarative::document_schema! {
    /// All document types of a stateful node request
    pub enum Schema;

    struct StatefulNode {
        name: String,
        region: String,
        resource_group_name: String,
        description: String,
        persistence: Persistence,
        health: Health,
        scheduling: Scheduling,
        strategy: Strategy,
        compute: Compute,
    }

    struct Persistence {
        data_disks_persistence_mode: String,
        os_disk_persistence_mode: String,
        should_persist_data_disks: bool,
        should_persist_network: bool,
        should_persist_os_disk: bool,
    }

    struct Health {
        health_check_types: Vec<String>,
        auto_healing: bool,
        grace_period: i64,
        unhealthy_duration: i64,
    }

    struct Scheduling {
        tasks: Vec<SchedulingTask>,
    }

    struct SchedulingTask {
        r#type: String,
        cron_expression: String,
        is_enabled: bool,
    }

    struct Strategy {
        draining_timeout: i64,
        fallback_to_od: bool,
        od_windows: Vec<String>,
        optimization_windows: Vec<String>,
        preferred_lifecycle: String,
        revert_to_spot: RevertToSpot,
        signals: Vec<Signal>,
    }

    struct RevertToSpot {
        perform_at: String,
    }

    struct Signal {
        r#type: String,
        timeout: i64,
    }

    struct Compute {
        launch_specification: LaunchSpecification,
        os: String,
        preferred_zone: String,
        vm_sizes: VmSizes,
        zones: Vec<String>,
    }

    struct VmSizes {
        od_sizes: Vec<String>,
        preferred_spot_sizes: Vec<String>,
        spot_sizes: Vec<String>,
    }

    struct LaunchSpecification {
        boot_diagnostics: BootDiagnostics,
        custom_data: String,
        data_disks: Vec<DataDisk>,
        extensions: Vec<Extension>,
        image: Image,
        license_type: String,
        load_balancers_config: LoadBalancerConfig,
        login: Login,
        managed_service_identities: Vec<ManagedServiceIdentity>,
        network: Network,
        os_disk: OsDisk,
        secrets: Vec<Secret>,
        shutdown_script: String,
        tags: Vec<Tag>,
        vm_name: String,
        vm_name_prefix: String,
    }

    struct BootDiagnostics {
        is_enabled: bool,
        storage_uri: String,
        r#type: String,
    }

    struct DataDisk {
        lun: i64,
        size_g_b: i64,
        r#type: String,
    }

    struct Extension {
        api_version: String,
        minor_version_auto_upgrade: bool,
        name: String,
        publisher: String,
        r#type: String,
    }

    struct Image {
        marketplace: MarketplaceImage,
        custom: CustomImage,
        gallery: GalleryImage,
    }

    struct MarketplaceImage {
        publisher: String,
        offer: String,
        sku: String,
        version: String,
    }

    struct CustomImage {
        resource_group_name: String,
        name: String,
    }

    struct GalleryImage {
        gallery_name: String,
        image_name: String,
        resource_group_name: String,
        spot_account_id: String,
        version_name: String,
    }

    struct LoadBalancerConfig {
        load_balancers: Vec<LoadBalancer>,
    }

    struct LoadBalancer {
        backend_pool_names: Vec<String>,
        load_balancer_sku: String,
        name: String,
        resource_group_name: String,
        r#type: String,
    }

    struct Login {
        ssh_public_key: String,
        user_name: String,
        password: String,
    }

    struct ManagedServiceIdentity {
        resource_group_name: String,
        name: String,
    }

    struct Network {
        network_interfaces: Vec<NetworkInterface>,
        virtual_network_name: String,
        resource_group_name: String,
    }

    struct NetworkInterface {
        additional_ip_configurations: Vec<AdditionalIpConfiguration>,
        application_security_groups: Vec<ApplicationSecurityGroup>,
        assign_public_ip: bool,
        enable_ip_forwarding: bool,
        is_primary: bool,
        network_security_group: NetworkSecurityGroup,
        private_ip_addresses: Vec<String>,
        public_ips: Vec<PublicIp>,
        public_ip_sku: String,
        subnet_name: String,
    }

    struct AdditionalIpConfiguration {
        name: String,
        private_ip_address_version: String,
    }

    struct ApplicationSecurityGroup {
        name: String,
        resource_group_name: String,
    }

    struct NetworkSecurityGroup {
        name: String,
        resource_group_name: String,
    }

    struct PublicIp {
        name: String,
        resource_group_name: String,
    }

    struct OsDisk {
        size_g_b: i64,
        r#type: String,
    }

    struct Secret {
        source_vault: SourceVault,
        vault_certificates: Vec<VaultCertificate>,
    }

    struct SourceVault {
        name: String,
        resource_group_name: String,
    }

    struct VaultCertificate {
        certificate_store: String,
        certificate_url: String,
    }

    struct Tag {
        tag_key: String,
        tag_value: String,
    }

    struct DeallocationConfig {
        disk_deallocation_config: Deallocate,
        network_deallocation_config: Deallocate,
        public_ip_deallocation_config: Deallocate,
        snapshot_deallocation_config: Deallocate,
        should_terminate_vm: bool,
    }

    struct Deallocate {
        should_deallocate: bool,
        ttl_in_hours: i64,
    }
}

/// Object-valued fields whose type is not their PascalCased name
const OBJECT_TYPES: &[(&str, &str)] = &[
    ("stateful_node.compute.launch_specification.load_balancers_config", "LoadBalancerConfig"),
    ("stateful_node.compute.launch_specification.managed_service_identities", "ManagedServiceIdentity"),
    ("stateful_node.compute.launch_specification.network.network_interfaces", "NetworkInterface"),
    ("stateful_node.compute.launch_specification.data_disks", "DataDisk"),
    ("stateful_node.compute.launch_specification.extensions", "Extension"),
    ("stateful_node.compute.launch_specification.secrets", "Secret"),
    ("stateful_node.compute.launch_specification.tags", "Tag"),
    ("stateful_node.compute.launch_specification.image.marketplace", "MarketplaceImage"),
    ("stateful_node.compute.launch_specification.image.custom", "CustomImage"),
    ("stateful_node.compute.launch_specification.image.gallery", "GalleryImage"),
    ("stateful_node.strategy.signals", "Signal"),
    ("stateful_node.scheduling.tasks", "SchedulingTask"),
    ("deallocation_config.disk_deallocation_config", "Deallocate"),
    ("deallocation_config.network_deallocation_config", "Deallocate"),
    ("deallocation_config.public_ip_deallocation_config", "Deallocate"),
    ("deallocation_config.snapshot_deallocation_config", "Deallocate"),
];

/// Collections nested inside other collections
const MEMBER_TYPES: &[(&str, &str)] = &[
    ("stateful_node.compute.launch_specification.load_balancers_config.load_balancers", "LoadBalancer"),
    ("stateful_node.compute.launch_specification.network.network_interfaces.application_security_groups", "ApplicationSecurityGroup"),
    ("stateful_node.compute.launch_specification.network.network_interfaces.additional_ip_configurations", "AdditionalIpConfiguration"),
    ("stateful_node.compute.launch_specification.network.network_interfaces.public_ips", "PublicIp"),
    ("stateful_node.compute.launch_specification.secrets.vault_certificates", "VaultCertificate"),
];

/// Build the stateful node type registry
pub fn registry() -> declarative::Result<TypeRegistry> {
    TypeRegistry::from_tables(OBJECT_TYPES, MEMBER_TYPES)
}
