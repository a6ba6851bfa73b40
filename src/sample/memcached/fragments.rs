//! Literal markers and code fragments patched into the scaffolded project.

/// Defaulting stub the webhook scaffold leaves in `Default()`
pub const DEFAULTING_TODO: &str = "// TODO(user): fill in your defaulting logic.";

/// End of the scaffolded `Default()` method; validation methods go after it
pub const DEFAULTING_TODO_END: &str = "// TODO(user): fill in your defaulting logic.\n}";

pub const DEFAULTING_BODY: &str = "if r.Spec.Size == 0 {\n\t\tr.Spec.Size = 3\n\t}";

pub const IMPORT_MARKER: &str = "import (";

pub const WEBHOOK_IMPORTS: &str = "\"errors\"\n\n\"k8s.io/apimachinery/pkg/runtime\"";

/// Validating webhook methods, rendered with the sample's GVK
pub const VALIDATION_WEBHOOK: &str = r#"
// TODO(user): change verbs to "verbs=create;update;delete" if you want to enable deletion validation.
//+kubebuilder:webhook:path=/validate-{{.GroupPath}}-{{.Version}}-{{.kind}},mutating=false,failurePolicy=fail,sideEffects=None,groups={{.ApiGroup}},resources={{.Resource}},verbs=create;update,versions={{.Version}},name=v{{.kind}}.kb.io,admissionReviewVersions=v1

var _ webhook.Validator = &{{.Kind}}{}

// ValidateCreate implements webhook.Validator so a webhook will be registered for the type
func (r *{{.Kind}}) ValidateCreate() error {
	{{.kind}}log.Info("validate create", "name", r.Name)

	return validateOdd(r.Spec.Size)
}

// ValidateUpdate implements webhook.Validator so a webhook will be registered for the type
func (r *{{.Kind}}) ValidateUpdate(old runtime.Object) error {
	{{.kind}}log.Info("validate update", "name", r.Name)

	return validateOdd(r.Spec.Size)
}

// ValidateDelete implements webhook.Validator so a webhook will be registered for the type
func (r *{{.Kind}}) ValidateDelete() error {
	{{.kind}}log.Info("validate delete", "name", r.Name)

	return nil
}
func validateOdd(n int32) error {
	if n%2 == 0 {
		return errors.New("Cluster size must be an odd number")
	}
	return nil
}
"#;

/// Single-line entries in `config/default/kustomization.yaml`, in patch order
pub const DEFAULT_KUSTOMIZATION_ENTRIES: [(&str, &str); 5] = [
    ("#- ../webhook", "webhook"),
    ("#- ../certmanager", "certmanager"),
    ("#- ../prometheus", "prometheus"),
    ("#- manager_webhook_patch.yaml", "manager_webhook_patch.yaml"),
    ("#- webhookcainjection_patch.yaml", "webhookcainjection_patch.yaml"),
];

/// cert-manager `vars` block of the go/v3 scaffold
pub const CERTIFICATE_VARS_V3: &str = r#"#- name: CERTIFICATE_NAMESPACE # namespace of the certificate CR
#  objref:
#    kind: Certificate
#    group: cert-manager.io
#    version: v1
#    name: serving-cert # this name should match the one in certificate.yaml
#  fieldref:
#    fieldpath: metadata.namespace
#- name: CERTIFICATE_NAME
#  objref:
#    kind: Certificate
#    group: cert-manager.io
#    version: v1
#    name: serving-cert # this name should match the one in certificate.yaml
#- name: SERVICE_NAMESPACE # namespace of the service
#  objref:
#    kind: Service
#    version: v1
#    name: webhook-service
#  fieldref:
#    fieldpath: metadata.namespace
#- name: SERVICE_NAME
#  objref:
#    kind: Service
#    version: v1
#    name: webhook-service"#;

/// cert-manager `replacements` block of the go/v4-alpha scaffold
pub const CERTIFICATE_REPLACEMENTS_V4: &str = r#"#replacements:
#  - source: # Add cert-manager annotation to ValidatingWebhookConfiguration, MutatingWebhookConfiguration and CRDs
#      kind: Certificate
#      group: cert-manager.io
#      version: v1
#      name: serving-cert # this name should match the one in certificate.yaml
#      fieldPath: .metadata.namespace # namespace of the certificate CR
#    targets:
#      - select:
#          kind: ValidatingWebhookConfiguration
#        fieldPaths:
#          - .metadata.annotations.[cert-manager.io/inject-ca-from]
#        options:
#          delimiter: '/'
#          index: 0
#          create: true
#      - select:
#          kind: MutatingWebhookConfiguration
#        fieldPaths:
#          - .metadata.annotations.[cert-manager.io/inject-ca-from]
#        options:
#          delimiter: '/'
#          index: 0
#          create: true
#      - select:
#          kind: CustomResourceDefinition
#        fieldPaths:
#          - .metadata.annotations.[cert-manager.io/inject-ca-from]
#        options:
#          delimiter: '/'
#          index: 0
#          create: true
#  - source:
#      kind: Certificate
#      group: cert-manager.io
#      version: v1
#      name: serving-cert # this name should match the one in certificate.yaml
#      fieldPath: .metadata.name
#    targets:
#      - select:
#          kind: ValidatingWebhookConfiguration
#        fieldPaths:
#          - .metadata.annotations.[cert-manager.io/inject-ca-from]
#        options:
#          delimiter: '/'
#          index: 1
#          create: true
#      - select:
#          kind: MutatingWebhookConfiguration
#        fieldPaths:
#          - .metadata.annotations.[cert-manager.io/inject-ca-from]
#        options:
#          delimiter: '/'
#          index: 1
#          create: true
#      - select:
#          kind: CustomResourceDefinition
#        fieldPaths:
#          - .metadata.annotations.[cert-manager.io/inject-ca-from]
#        options:
#          delimiter: '/'
#          index: 1
#          create: true
#  - source: # Add cert-manager annotation to the webhook Service
#      kind: Service
#      version: v1
#      name: webhook-service
#      fieldPath: .metadata.name # namespace of the service
#    targets:
#      - select:
#          kind: Certificate
#          group: cert-manager.io
#          version: v1
#        fieldPaths:
#          - .spec.dnsNames.0
#          - .spec.dnsNames.1
#        options:
#          delimiter: '.'
#          index: 0
#          create: true
#  - source:
#      kind: Service
#      version: v1
#      name: webhook-service
#      fieldPath: .metadata.namespace # namespace of the service
#    targets:
#      - select:
#          kind: Certificate
#          group: cert-manager.io
#          version: v1
#        fieldPaths:
#          - .spec.dnsNames.0
#          - .spec.dnsNames.1
#        options:
#          delimiter: '.'
#          index: 1
#          create: true"#;

/// OLM volume-removal patch in `config/manifests/kustomization.yaml`
///
/// Only the manager container index differs between layouts.
pub fn manifests_volume_patch(container_index: usize) -> String {
    format!(
        r#"#patchesJson6902:
#- target:
#    group: apps
#    version: v1
#    kind: Deployment
#    name: controller-manager
#    namespace: system
#  patch: |-
#    # Remove the manager container's "cert" volumeMount, since OLM will create and mount a set of certs.
#    # Update the indices in this path if adding or removing containers/volumeMounts in the manager's Deployment.
#    - op: remove
#      path: /spec/template/spec/containers/{container_index}/volumeMounts/0
#    # Remove the "cert" volume, since OLM will create and mount a set of certs.
#    # Update the indices in this path if adding or removing volumes in the manager's Deployment.
#    - op: remove
#      path: /spec/template/spec/volumes/0"#
    )
}
